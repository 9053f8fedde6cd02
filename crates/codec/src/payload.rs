//! Markdown records embedded in field HTML as a trailing comment.
//!
//! The comment looks like `<!----SBAdata:PAYLOAD---->`, where `PAYLOAD` is
//! standard padded base64 of the record's JSON. A field carries at most one.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CodecError, FieldError};

/// Opens the embedded payload comment.
pub const START_MARKER: &str = "<!----SBAdata:";
/// Closes the embedded payload comment.
pub const END_MARKER: &str = "---->";

/// Key that is never carried in a record.
const HTML_KEY: &str = "html";

/// Outcome of decoding a payload string.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload was present.
    Empty,
    /// A payload was present but could not be decoded.
    Corrupted,
    /// Decoded JSON value.
    Data(Value),
}

impl Payload {
    /// Whether this is [`Payload::Corrupted`].
    pub fn is_corrupted(&self) -> bool {
        matches!(self, Payload::Corrupted)
    }
}

/// Markdown source and bookkeeping stored alongside rendered HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownRecord {
    /// Host note/field identifier.
    pub id: i64,
    /// Whether the field currently shows rendered Markdown.
    #[serde(rename = "isconverted")]
    pub is_converted: bool,
    /// Markdown source.
    #[serde(rename = "md")]
    pub markdown: String,
    /// Host modification stamp, empty when unknown.
    #[serde(rename = "lastmodified", default)]
    pub last_modified: String,
    /// Keys this version does not know about, kept for round trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarkdownRecord {
    /// Record with an empty modification stamp and no extra keys.
    pub fn new(id: i64, is_converted: bool, markdown: impl Into<String>) -> Self {
        Self {
            id,
            is_converted,
            markdown: markdown.into(),
            last_modified: String::new(),
            extra: Map::new(),
        }
    }

    /// Set the modification stamp.
    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = last_modified.into();
        self
    }
}

/// Payload text between the markers, or `""` when either marker is missing.
pub fn extract_payload(html: &str) -> &str {
    let Some(start) = html.find(START_MARKER) else {
        return "";
    };
    let body = &html[start + START_MARKER.len()..];
    match body.find(END_MARKER) {
        Some(end) => &body[..end],
        None => "",
    }
}

/// `html` with its payload comment removed, if it has a complete one.
pub fn strip_payload(html: &str) -> String {
    let Some(start) = html.find(START_MARKER) else {
        return html.to_string();
    };
    let after_start = start + START_MARKER.len();
    match html[after_start..].find(END_MARKER) {
        Some(end) => {
            let stop = after_start + end + END_MARKER.len();
            format!("{}{}", &html[..start], &html[stop..])
        }
        None => html.to_string(),
    }
}

fn try_decode(payload: &str) -> Result<Value, CodecError> {
    let bytes = general_purpose::STANDARD.decode(payload)?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Decode a payload string. Never fails: undecodable input is
/// [`Payload::Corrupted`].
pub fn decompress_and_parse(payload: &str) -> Payload {
    if payload.is_empty() {
        return Payload::Empty;
    }
    match try_decode(payload) {
        Ok(value) => Payload::Data(value),
        Err(err) => {
            log::debug!("discarding payload: {err}");
            Payload::Corrupted
        }
    }
}

/// Serialize `value` to JSON and base64 encode it.
pub fn compress<T: Serialize + ?Sized>(value: &T) -> Result<String, FieldError> {
    let json = serde_json::to_string(value).map_err(FieldError::Serialize)?;
    Ok(general_purpose::STANDARD.encode(json))
}

fn record_value(record: &MarkdownRecord) -> Result<Value, FieldError> {
    let mut value = serde_json::to_value(record).map_err(FieldError::Serialize)?;
    if let Value::Object(map) = &mut value {
        map.remove(HTML_KEY);
    }
    Ok(value)
}

/// Append `record` to `html` as a payload comment, replacing any existing one.
pub fn encode_field(html: &str, record: &MarkdownRecord) -> Result<String, FieldError> {
    let payload = compress(&record_value(record)?)?;
    let mut out = strip_payload(html);
    out.push_str(START_MARKER);
    out.push_str(&payload);
    out.push_str(END_MARKER);
    Ok(out)
}

/// Decode the record embedded in `html`.
///
/// `Ok(None)` when there is no payload or it is corrupted; an error only when
/// the payload is valid JSON of the wrong shape.
pub fn decode_field(html: &str) -> Result<Option<MarkdownRecord>, FieldError> {
    match decompress_and_parse(extract_payload(html)) {
        Payload::Empty => Ok(None),
        Payload::Corrupted => {
            log::warn!("field payload is corrupted, ignoring it");
            Ok(None)
        }
        Payload::Data(value) => {
            let mut record: MarkdownRecord =
                serde_json::from_value(value).map_err(FieldError::InvalidRecord)?;
            record.extra.remove(HTML_KEY);
            Ok(Some(record))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn b64(json: &str) -> String {
        general_purpose::STANDARD.encode(json)
    }

    #[test]
    fn extract_requires_both_markers() {
        assert_eq!(extract_payload(""), "");
        assert_eq!(extract_payload("<div></div>"), "");
        assert_eq!(extract_payload("<div></div><!----SBAdata{data:data}"), "");
        assert_eq!(extract_payload("<div></div><!----SBAdata:abc"), "");
    }

    #[test]
    fn extract_returns_payload_verbatim() {
        assert_eq!(
            extract_payload("<div></div><!----SBAdata:randomtext---->"),
            "randomtext"
        );
        assert_eq!(extract_payload("<div></div><!----SBAdata:---->"), "");
        let encoded = b64(r#"{"a": "one"}"#);
        let html = format!("<div></div><!----SBAdata:{encoded}---->");
        assert_eq!(extract_payload(&html), encoded);
    }

    #[test]
    fn end_marker_before_start_is_ignored() {
        assert_eq!(extract_payload("----><!----SBAdata:x"), "");
    }

    #[test]
    fn decode_classifies_payloads() {
        assert_eq!(decompress_and_parse(""), Payload::Empty);
        assert_eq!(decompress_and_parse("randomtext"), Payload::Corrupted);
        assert_eq!(decompress_and_parse("randomtext=="), Payload::Corrupted);
        assert_eq!(decompress_and_parse("ëandomtext=="), Payload::Corrupted);
        assert_eq!(
            decompress_and_parse(&b64(r#"{"a": "one"}"#)),
            Payload::Data(json!({"a": "one"}))
        );
    }

    #[test]
    fn non_utf8_bytes_are_corrupted() {
        let payload = general_purpose::STANDARD.encode([0xff, 0xfe, 0x7b]);
        assert!(decompress_and_parse(&payload).is_corrupted());
    }

    #[test]
    fn compress_is_base64_json() {
        assert_eq!(compress(&json!({"a": "one"})).unwrap(), b64(r#"{"a":"one"}"#));
        assert_eq!(compress("привет").unwrap(), b64("\"привет\""));
    }

    #[test]
    fn new_record_has_empty_stamp_and_no_html() {
        let record = MarkdownRecord::new(1, true, "один");
        assert_eq!(record.markdown, "один");
        assert_eq!(record.last_modified, "");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "isconverted": true, "md": "один", "lastmodified": ""})
        );
    }

    #[test]
    fn encode_replaces_existing_payload() {
        let first = encode_field("<p>x</p>", &MarkdownRecord::new(1, true, "x")).unwrap();
        let second = encode_field(&first, &MarkdownRecord::new(1, true, "y")).unwrap();
        assert_eq!(second.matches(START_MARKER).count(), 1);
        assert!(second.starts_with("<p>x</p>"));
        assert_eq!(decode_field(&second).unwrap().unwrap().markdown, "y");
    }

    #[test]
    fn unknown_keys_survive_but_html_is_dropped() {
        let value = json!({
            "id": 7, "isconverted": false, "md": "m", "html": "<p>m</p>", "theme": "dark"
        });
        let html = format!("{START_MARKER}{}{END_MARKER}", compress(&value).unwrap());
        let record = decode_field(&html).unwrap().unwrap();
        assert_eq!(record.last_modified, "");
        assert_eq!(record.extra.get("theme"), Some(&json!("dark")));
        assert!(!record.extra.contains_key("html"));
    }

    #[test]
    fn wrong_shape_is_an_error_and_garbage_is_none() {
        let html = format!("{START_MARKER}{}{END_MARKER}", compress(&json!([1, 2])).unwrap());
        assert!(matches!(decode_field(&html), Err(FieldError::InvalidRecord(_))));
        assert!(decode_field("<!----SBAdata:randomtext---->").unwrap().is_none());
        assert!(decode_field("<div></div>").unwrap().is_none());
    }
}
