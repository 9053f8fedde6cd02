use fieldmark_core::SourceLocation;
use markdown::message::{Message, Place};
use thiserror::Error;

/// Reasons a payload cannot be decoded. Callers outside the payload module
/// only ever see these folded into [`crate::Payload::Corrupted`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload is not valid padded base64.
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8.
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text is not JSON.
    #[error("payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the field conversion pipeline.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The Markdown renderer rejected the input.
    #[error("Render error at {location}: {message}")]
    Render {
        /// Human-readable message.
        message: String,
        /// Where in the Markdown the problem was found.
        location: SourceLocation,
    },

    /// The HTML rewriter failed.
    #[error("HTML rewrite error: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),

    /// The payload decoded but does not describe a Markdown record.
    #[error("payload is not a Markdown record: {0}")]
    InvalidRecord(#[source] serde_json::Error),

    /// A record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl From<Message> for FieldError {
    fn from(message: Message) -> Self {
        let location = match &message.place {
            Some(place) => match place.as_ref() {
                Place::Point(point) => SourceLocation::new(point.line, point.column),
                Place::Position(position) => {
                    SourceLocation::new(position.start.line, position.start.column)
                }
            },
            None => SourceLocation::new(1, 1),
        };
        FieldError::Render {
            message: message.to_string(),
            location,
        }
    }
}
