use std::collections::BTreeMap;

use fieldmark_codec::{FieldConfig, FieldConverter, Origin};
use fieldmark_core::Platform;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Field Config
// ============================================================================

/// Configuration accepted by the field conversion functions.
/// Mirrors `FieldConfig`; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasmFieldConfig {
    #[serde(default, alias = "keepEmptyLines")]
    pub keep_empty_lines: Option<bool>,
    #[serde(default, alias = "putBreaks")]
    pub put_breaks: Option<bool>,
    #[serde(default, alias = "fenceMarker")]
    pub fence_marker: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

fn parse_config(config: JsValue) -> WasmFieldConfig {
    if config.is_undefined() || config.is_null() {
        return WasmFieldConfig::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_default()
}

fn build_field_config(cfg: WasmFieldConfig) -> FieldConfig {
    let defaults = FieldConfig::default();
    FieldConfig {
        keep_empty_lines: cfg.keep_empty_lines.unwrap_or(defaults.keep_empty_lines),
        put_breaks: cfg.put_breaks.unwrap_or(defaults.put_breaks),
        fence_marker: cfg.fence_marker.unwrap_or(defaults.fence_marker),
        platform: cfg
            .platform
            .as_deref()
            .map(Platform::from_id)
            .unwrap_or(defaults.platform),
    }
}

fn converter(config: JsValue) -> FieldConverter {
    FieldConverter::new(build_field_config(parse_config(config)))
}

fn platform_or_current(platform: Option<String>) -> Platform {
    platform.as_deref().map(Platform::from_id).unwrap_or_else(Platform::current)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Field API Types
// ============================================================================

/// Markdown recovered from a field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertResult {
    /// Recovered Markdown source.
    pub markdown: String,
    /// Whether it came from the embedded payload rather than the field HTML.
    pub from_payload: bool,
    /// Modification stamp stored with the payload, empty otherwise.
    pub last_modified: String,
}

// ============================================================================
// Field API
// ============================================================================

/// Render the Markdown typed into `html` and embed the source.
///
/// ```js
/// import { render_field } from './fieldmark_wasm';
///
/// const html = render_field("<div># Title</div>", 1n, "", { keepEmptyLines: false });
/// // "<h1>Title</h1><!----SBAdata:...---->"
/// ```
#[wasm_bindgen]
pub fn render_field(
    html: &str,
    id: i64,
    last_modified: &str,
    config: JsValue,
) -> Result<String, JsError> {
    converter(config)
        .render(html, id, last_modified)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Recover the Markdown behind a rendered field.
#[wasm_bindgen]
pub fn revert_field(html: &str, config: JsValue) -> Result<JsValue, JsError> {
    let reverted = converter(config)
        .revert(html)
        .map_err(|e| JsError::new(&e.to_string()))?;
    let result = RevertResult {
        from_payload: reverted.origin == Origin::Payload,
        last_modified: reverted
            .record
            .map(|record| record.last_modified)
            .unwrap_or_default(),
        markdown: reverted.markdown,
    };
    to_js(&result)
}

/// Recover the Markdown behind a rendered field, laid out as editable HTML.
#[wasm_bindgen]
pub fn revert_field_to_html(html: &str, config: JsValue) -> Result<String, JsError> {
    converter(config)
        .revert_to_field(html)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Strip field HTML down to the Markdown the user typed.
#[wasm_bindgen]
pub fn strip_html(html: &str, keep_empty_lines: bool) -> Result<String, JsError> {
    fieldmark_codec::strip_html_to_markdown(html, keep_empty_lines)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Lay out Markdown as one `<div>` per line.
#[wasm_bindgen]
pub fn clean_markdown_to_html(markdown: &str, put_breaks: bool) -> String {
    fieldmark_codec::clean_markdown_to_html(markdown, put_breaks)
}

/// Payload text embedded in `html`, or `""`.
#[wasm_bindgen]
pub fn extract_payload(html: &str) -> String {
    fieldmark_codec::extract_payload(html).to_string()
}

/// Escape HTML special characters.
#[wasm_bindgen]
pub fn escape_html(text: &str) -> String {
    fieldmark_core::escape_html(text)
}

// ============================================================================
// Preferences API
// ============================================================================

/// Canonical spelling of a keybinding, or `""` when it is invalid.
///
/// `platform` defaults to the build target's platform.
#[wasm_bindgen]
pub fn normalize_keybinding(raw: &str, platform: Option<String>) -> String {
    fieldmark_core::normalize_keybinding(raw, platform_or_current(platform))
}

/// Validate a map of user keybindings against the defaults.
#[wasm_bindgen]
pub fn check_user_keybindings(
    defaults: JsValue,
    user: JsValue,
    platform: Option<String>,
) -> Result<JsValue, JsError> {
    let defaults: BTreeMap<String, String> = serde_wasm_bindgen::from_value(defaults)
        .map_err(|e| JsError::new(&format!("Invalid defaults: {}", e)))?;
    let user: BTreeMap<String, String> = serde_wasm_bindgen::from_value(user)
        .map_err(|e| JsError::new(&format!("Invalid keybindings: {}", e)))?;
    let checked =
        fieldmark_core::check_user_keybindings(&defaults, &user, platform_or_current(platform));
    to_js(&checked)
}

/// Keep exactly the default preference keys, preferring the user's values.
#[wasm_bindgen]
pub fn normalize_user_prefs(defaults: JsValue, user: JsValue) -> Result<JsValue, JsError> {
    let defaults: Map<String, Value> = serde_wasm_bindgen::from_value(defaults)
        .map_err(|e| JsError::new(&format!("Invalid defaults: {}", e)))?;
    let user: Map<String, Value> = if user.is_undefined() || user.is_null() {
        Map::new()
    } else {
        serde_wasm_bindgen::from_value(user)
            .map_err(|e| JsError::new(&format!("Invalid preferences: {}", e)))?
    };
    to_js(&fieldmark_codec::normalize_user_prefs(&defaults, &user))
}
