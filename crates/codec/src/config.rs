use fieldmark_core::{Platform, ScanOptions};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_fence_marker() -> String {
    "```".to_string()
}

/// Per-call settings for field conversion.
///
/// Accepts both snake_case and camelCase keys so host preference maps and
/// JavaScript callers can pass their own spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Separate stripped lines with a blank line.
    #[serde(alias = "keepEmptyLines")]
    pub keep_empty_lines: bool,
    /// Render empty lines as `<div><br /></div>` in clean Markdown view.
    #[serde(alias = "putBreaks")]
    pub put_breaks: bool,
    /// Fence delimiter recognized by the region scanner.
    #[serde(alias = "fenceMarker", default = "default_fence_marker")]
    pub fence_marker: String,
    /// Host platform for keybinding validation.
    pub platform: Platform,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            keep_empty_lines: false,
            put_breaks: false,
            fence_marker: default_fence_marker(),
            platform: Platform::current(),
        }
    }
}

impl FieldConfig {
    /// Build from a host preference snapshot. Unknown keys are ignored;
    /// missing keys and keys whose value has the wrong type keep their
    /// defaults.
    pub fn from_prefs(prefs: &Map<String, Value>) -> Self {
        let mut config = Self::default();
        for (key, value) in prefs {
            let applied = match key.as_str() {
                "keep_empty_lines" | "keepEmptyLines" => {
                    pref(value).map(|v| config.keep_empty_lines = v)
                }
                "put_breaks" | "putBreaks" => pref(value).map(|v| config.put_breaks = v),
                "fence_marker" | "fenceMarker" => pref(value).map(|v| config.fence_marker = v),
                "platform" => pref(value).map(|v| config.platform = v),
                _ => continue,
            };
            if let Err(err) = applied {
                log::warn!("ignoring malformed preference `{key}`: {err}");
            }
        }
        config
    }

    /// Scanner options derived from this configuration.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::with_fence_marker(&self.fence_marker)
    }
}

fn pref<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value.clone())
}

/// Reconcile stored user preferences with the current defaults: exactly the
/// default keys survive, taking the user's value where one exists.
pub fn normalize_user_prefs(
    defaults: &Map<String, Value>,
    user: &Map<String, Value>,
) -> Map<String, Value> {
    defaults
        .iter()
        .map(|(key, default)| {
            let value = user.get(key).unwrap_or(default);
            (key.clone(), value.clone())
        })
        .collect()
}
