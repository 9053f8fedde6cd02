//! Keybinding parsing and canonicalization.
//!
//! Users type shortcuts freely ("p-Alt-Ctrl", "F12+Shift"); hosts need one
//! canonical spelling. [`KeySpec::parse`] does the typed validation and
//! [`normalize_keybinding`] flattens the outcome to the host's string
//! contract, where the empty string means "invalid, use the default".

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host platform; decides whether `meta` is an allowed modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Platform {
    /// macOS (`darwin`).
    Mac,
    /// Every other platform.
    #[default]
    Other,
}

impl Platform {
    /// Map a platform identifier such as `sys.platform` values onto a platform.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "darwin" | "mac" | "macos" | "macosx" => Platform::Mac,
            _ => Platform::Other,
        }
    }

    /// Platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

impl From<String> for Platform {
    fn from(id: String) -> Self {
        Platform::from_id(&id)
    }
}

/// Keyboard modifier. Declaration order is the canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    /// Control.
    Ctrl,
    /// Command key, macOS only.
    Meta,
    /// Shift.
    Shift,
    /// Alt / Option.
    Alt,
}

impl Modifier {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "ctrl" => Some(Modifier::Ctrl),
            "meta" => Some(Modifier::Meta),
            "shift" => Some(Modifier::Shift),
            "alt" => Some(Modifier::Alt),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "ctrl",
            Modifier::Meta => "meta",
            Modifier::Shift => "shift",
            Modifier::Alt => "alt",
        }
    }
}

/// The non-modifier part of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Lowercase ASCII letter, digit, or ASCII punctuation.
    Char(char),
    /// Function key `f1` to `f12`.
    Function(u8),
}

impl Key {
    fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let valid = c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_ascii_punctuation();
            return valid.then_some(Key::Char(c));
        }
        let number: u8 = token.strip_prefix('f')?.parse().ok()?;
        (1..=12).contains(&number).then_some(Key::Function(number))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Function(n) => write!(f, "f{}", n),
        }
    }
}

/// Reasons a keybinding string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Nothing but whitespace.
    #[error("empty keybinding")]
    Empty,
    /// Token that is neither a modifier nor a key.
    #[error("unrecognized token '{0}'")]
    UnknownToken(String),
    /// `meta` requested on a platform without it.
    #[error("meta is only available on mac")]
    MetaOutsideMac,
    /// Only modifiers were given.
    #[error("keybinding has no key")]
    MissingKey,
    /// More than one non-modifier key.
    #[error("keybinding has more than one key ('{first}' and '{second}')")]
    MultipleKeys {
        /// Key seen first.
        first: String,
        /// Offending second key.
        second: String,
    },
}

/// Validated modifier set plus exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySpec {
    /// Modifiers, each at most once, iterated in canonical order.
    pub modifiers: BTreeSet<Modifier>,
    /// The key.
    pub key: Key,
}

impl KeySpec {
    /// Parse a freeform binding such as `"Q-Meta-CTRL"`.
    pub fn parse(raw: &str, platform: Platform) -> Result<Self, KeyError> {
        let tokens = tokenize(raw);
        if tokens.is_empty() {
            return Err(KeyError::Empty);
        }

        let mut modifiers = BTreeSet::new();
        let mut key: Option<Key> = None;
        for token in tokens {
            let token = token.to_lowercase();
            if let Some(modifier) = Modifier::from_token(&token) {
                if modifier == Modifier::Meta && platform != Platform::Mac {
                    return Err(KeyError::MetaOutsideMac);
                }
                modifiers.insert(modifier);
                continue;
            }

            let parsed = Key::from_token(&token).ok_or(KeyError::UnknownToken(token))?;
            if let Some(first) = key {
                return Err(KeyError::MultipleKeys {
                    first: first.to_string(),
                    second: parsed.to_string(),
                });
            }
            key = Some(parsed);
        }

        let key = key.ok_or(KeyError::MissingKey)?;
        Ok(KeySpec { modifiers, key })
    }
}

/// Canonical form: modifiers in `ctrl, meta, shift, alt` order, then the key,
/// joined with `+`.
impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}

/// Canonicalize `raw`, returning an empty string when it is invalid.
pub fn normalize_keybinding(raw: &str, platform: Platform) -> String {
    match KeySpec::parse(raw, platform) {
        Ok(spec) => spec.to_string(),
        Err(err) => {
            log::debug!("rejected keybinding {raw:?}: {err}");
            String::new()
        }
    }
}

/// Validate user keybindings against their defaults.
///
/// Every user entry is canonicalized; an invalid entry falls back to the
/// default binding of the same name (kept as written), or is dropped when
/// there is no default.
pub fn check_user_keybindings(
    defaults: &BTreeMap<String, String>,
    user: &BTreeMap<String, String>,
    platform: Platform,
) -> BTreeMap<String, String> {
    user.iter()
        .filter_map(|(name, binding)| {
            let normalized = normalize_keybinding(binding, platform);
            if !normalized.is_empty() {
                return Some((name.clone(), normalized));
            }
            log::warn!("invalid keybinding {binding:?} for {name}, using default");
            defaults
                .get(name)
                .map(|default| (name.clone(), default.clone()))
        })
        .collect()
}

fn is_separator(c: char) -> bool {
    matches!(c, '+' | '-' | ' ')
}

/// Split on separator runs. A run at either edge of the input is the key
/// itself: `"alt-shift++"` ends with the key `+`, `"-"` is the key `-`.
fn tokenize(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let Some(body_start) = trimmed.find(|c: char| !is_separator(c)) else {
        return trimmed
            .chars()
            .rev()
            .find(|c| *c != ' ')
            .map(|c| vec![c.to_string()])
            .unwrap_or_default();
    };
    let body_end = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| !is_separator(*c))
        .map_or(trimmed.len(), |(idx, c)| idx + c.len_utf8());

    let mut tokens = Vec::new();
    if let Some(c) = trimmed[..body_start].chars().find(|c| *c != ' ') {
        tokens.push(c.to_string());
    }
    tokens.extend(
        trimmed[body_start..body_end]
            .split(is_separator)
            .filter(|token| !token.is_empty())
            .map(str::to_string),
    );
    if let Some(c) = trimmed[body_end..].chars().rev().find(|c| *c != ' ') {
        tokens.push(c.to_string());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn other(raw: &str) -> String {
        normalize_keybinding(raw, Platform::Other)
    }

    fn mac(raw: &str) -> String {
        normalize_keybinding(raw, Platform::Mac)
    }

    #[test]
    fn single_keys_pass_through() {
        assert_eq!(other(""), "");
        assert_eq!(other("a"), "a");
        assert_eq!(other("-"), "-");
        assert_eq!(other("F12"), "f12");
    }

    #[test]
    fn reorders_modifiers_canonically() {
        assert_eq!(other("p-Alt-Ctrl"), "ctrl+alt+p");
        assert_eq!(other("F12+Shift"), "shift+f12");
        assert_eq!(other("shift+F12"), "shift+f12");
        assert_eq!(mac("Q-Meta-CTRL"), "ctrl+meta+q");
        assert_eq!(mac("ctrl+shift+alt+meta+f5"), "ctrl+meta+shift+alt+f5");
    }

    #[test]
    fn punctuation_and_digits_are_keys() {
        assert_eq!(other("ctrl+,"), "ctrl+,");
        assert_eq!(other("ctrl-,"), "ctrl+,");
        assert_eq!(other(",+ctrl"), "ctrl+,");
        assert_eq!(other("ctrl+1"), "ctrl+1");
        assert_eq!(other("ctrl+!"), "ctrl+!");
    }

    #[test]
    fn trailing_separator_run_is_the_key() {
        assert_eq!(other("alt-shift++"), "shift+alt++");
        assert_eq!(other("alt-shift+++"), "shift+alt++");
        assert_eq!(other("ctrl+-"), "ctrl+-");
        assert_eq!(mac("MeTA---META---ShIFT++++"), "meta+shift++");
    }

    #[test]
    fn duplicate_modifiers_and_separator_runs_collapse() {
        assert_eq!(other("alt+alt+ctrl+p"), "ctrl+alt+p");
        assert_eq!(other("alt-alt------shift+p"), "shift+alt+p");
        assert_eq!(mac("alt-alt------shift+p"), "shift+alt+p");
    }

    #[test]
    fn space_separates_tokens() {
        assert_eq!(mac("ctrl alt p"), "ctrl+alt+p");
        assert_eq!(other("  ctrl shift  a "), "ctrl+shift+a");
    }

    #[test]
    fn rejects_invalid_bindings() {
        assert_eq!(other(",+ctr"), "");
        assert_eq!(other("alt+shift+greka+q"), "");
        assert_eq!(mac("alt+shift+greka+q"), "");
        assert_eq!(other("alt+shift+ctrl"), "");
        assert_eq!(other("F12+F11"), "");
        assert_eq!(other("F12+a"), "");
        assert_eq!(other("ctrl+f13"), "");
        assert_eq!(other("ctrl+é"), "");
    }

    #[test]
    fn reports_typed_rejection_reasons() {
        assert_eq!(KeySpec::parse("   ", Platform::Other), Err(KeyError::Empty));
        assert_eq!(KeySpec::parse("meta+q", Platform::Other), Err(KeyError::MetaOutsideMac));
        assert_eq!(KeySpec::parse("alt+shift", Platform::Other), Err(KeyError::MissingKey));
        assert_eq!(
            KeySpec::parse("ctrl+iota", Platform::Other),
            Err(KeyError::UnknownToken("iota".to_string()))
        );
        assert_eq!(
            KeySpec::parse("F12+a", Platform::Other),
            Err(KeyError::MultipleKeys {
                first: "f12".to_string(),
                second: "a".to_string()
            })
        );
    }

    #[test]
    fn platform_ids_map_to_mac_or_other() {
        assert_eq!(Platform::from_id("darwin"), Platform::Mac);
        assert_eq!(Platform::from_id("linux2"), Platform::Other);
        assert_eq!(Platform::from_id("win32"), Platform::Other);
    }

    #[test]
    fn user_keybindings_fall_back_to_defaults() {
        let defaults = BTreeMap::from([("a".to_string(), "ctrl-alt-del".to_string())]);

        let invalid = BTreeMap::from([("a".to_string(), "ctrl-iota-a".to_string())]);
        assert_eq!(check_user_keybindings(&defaults, &invalid, Platform::Other), defaults);

        let valid = BTreeMap::from([("a".to_string(), "ctrl-shift-a".to_string())]);
        assert_eq!(
            check_user_keybindings(&defaults, &valid, Platform::Other),
            BTreeMap::from([("a".to_string(), "ctrl+shift+a".to_string())])
        );

        assert!(check_user_keybindings(&defaults, &BTreeMap::new(), Platform::Other).is_empty());
    }
}
