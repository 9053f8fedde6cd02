#![deny(missing_docs)]
//! fieldmark codec: Markdown source embedded in rendered field HTML,
//! conversion between field HTML and Markdown, and the render/revert
//! pipeline built on them.

/// Field configuration and preference reconciliation.
pub mod config;
/// Render and revert pipeline.
pub mod convert;
/// Codec error types.
pub mod error;
/// HTML to Markdown stripping and Markdown layout as HTML.
pub mod html;
/// Payload markers and transport encoding.
pub mod payload;
/// Markdown rendering.
pub mod render;
/// Re-entrancy guard for host conversions.
pub mod safe_block;

pub use config::{FieldConfig, normalize_user_prefs};
pub use convert::{FieldConverter, Origin, Reverted};
pub use error::{CodecError, FieldError};
pub use html::{clean_markdown_to_html, put_colons_in_html_def_list, strip_html_to_markdown};
pub use payload::{
    END_MARKER, MarkdownRecord, Payload, START_MARKER, compress, decode_field,
    decompress_and_parse, encode_field, extract_payload, strip_payload,
};
pub use render::render_markdown;
pub use safe_block::SafeBlock;
