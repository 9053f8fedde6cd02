//! Field-level conversion: rich-text field HTML to rendered Markdown and back.

use fieldmark_core::{
    ScanOptions, remove_leading_whitespace_from_dd_element,
    remove_whitespace_before_abbreviation_definition, replace_in_image_targets,
};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::html::{clean_markdown_to_html, put_colons_in_html_def_list, strip_html_to_markdown};
use crate::payload::{MarkdownRecord, decode_field, encode_field, strip_payload};
use crate::render::render_markdown;

/// Rewrites applied inside image targets so file names with spaces and
/// escaped parentheses survive rendering. Applied in order.
static IMAGE_TARGET_ESCAPES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [(r"\s+", "&#32;"), (r"\\\(", "&#40;"), (r"\\\)", "&#41;")]
        .into_iter()
        .map(|(pattern, replacement)| {
            (Regex::new(pattern).expect("image target pattern is valid"), replacement)
        })
        .collect()
});

/// Where reverted Markdown came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The embedded payload.
    Payload,
    /// Recovered from the field HTML itself.
    Html,
}

/// Markdown recovered from a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Reverted {
    /// Markdown source.
    pub markdown: String,
    /// Where it came from.
    pub origin: Origin,
    /// The decoded record, when the payload was usable.
    pub record: Option<MarkdownRecord>,
}

/// Converts fields with one configuration.
#[derive(Debug, Clone)]
pub struct FieldConverter {
    config: FieldConfig,
    scan_options: ScanOptions,
}

impl Default for FieldConverter {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl FieldConverter {
    /// Converter for `config`.
    pub fn new(config: FieldConfig) -> Self {
        let scan_options = config.scan_options();
        Self {
            config,
            scan_options,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Prepare Markdown for the renderer: unindent abbreviation and
    /// definition lines, escape image targets outside code.
    pub fn preprocess(&self, markdown: &str) -> String {
        let markdown = remove_whitespace_before_abbreviation_definition(markdown);
        let markdown = remove_leading_whitespace_from_dd_element(&markdown, true);
        IMAGE_TARGET_ESCAPES
            .iter()
            .fold(markdown, |text, (pattern, replacement)| {
                replace_in_image_targets(pattern, replacement, &text, &self.scan_options)
            })
    }

    /// Render the Markdown behind `field_html` and embed the source as a
    /// payload.
    ///
    /// A field that already carries a payload is rendered from the payload's
    /// Markdown, not from its rendered HTML.
    pub fn render(
        &self,
        field_html: &str,
        id: i64,
        last_modified: &str,
    ) -> Result<String, FieldError> {
        let markdown = self.revert(field_html)?.markdown;
        let html = render_markdown(&self.preprocess(&markdown))?;
        let record = MarkdownRecord::new(id, true, markdown).with_last_modified(last_modified);
        encode_field(&html, &record)
    }

    /// Recover the Markdown behind `field_html`.
    ///
    /// Uses the embedded payload when it decodes to a record; otherwise the
    /// HTML is stripped, with definition-list colons restored first.
    pub fn revert(&self, field_html: &str) -> Result<Reverted, FieldError> {
        let record = decode_field(field_html).unwrap_or_else(|err| {
            log::warn!("{err}, using field HTML");
            None
        });
        if let Some(record) = record {
            return Ok(Reverted {
                markdown: record.markdown.clone(),
                origin: Origin::Payload,
                record: Some(record),
            });
        }

        let html = put_colons_in_html_def_list(&strip_payload(field_html))?;
        Ok(Reverted {
            markdown: strip_html_to_markdown(&html, self.config.keep_empty_lines)?,
            origin: Origin::Html,
            record: None,
        })
    }

    /// Recover the Markdown behind `field_html` and lay it out as editable
    /// field HTML.
    pub fn revert_to_field(&self, field_html: &str) -> Result<String, FieldError> {
        let reverted = self.revert(field_html)?;
        Ok(clean_markdown_to_html(&reverted.markdown, self.config.put_breaks))
    }
}
