use fieldmark_wasm::{
    check_user_keybindings, clean_markdown_to_html, escape_html, extract_payload,
    normalize_keybinding, normalize_user_prefs, render_field, revert_field, revert_field_to_html,
    strip_html,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RevertResult {
    markdown: String,
    from_payload: bool,
    last_modified: String,
}

fn js(json: &str) -> JsValue {
    js_sys::JSON::parse(json).expect("valid JSON")
}

#[wasm_bindgen_test]
fn render_then_revert_returns_typed_markdown() {
    let html = render_field("<div># Hello</div><div>**bold**</div>", 7, "stamp", JsValue::UNDEFINED)
        .expect("render should succeed");
    assert!(html.contains("<h1>Hello</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(!extract_payload(&html).is_empty());

    let result = revert_field(&html, JsValue::NULL).expect("revert should succeed");
    let result: RevertResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");
    assert!(result.from_payload);
    assert_eq!(result.markdown, "# Hello\n**bold**\n");
    assert_eq!(result.last_modified, "stamp");
}

#[wasm_bindgen_test]
fn revert_without_payload_uses_field_html() {
    let result = revert_field("1. one<div>2. two</div>", js(r#"{"keepEmptyLines": true}"#))
        .expect("revert should succeed");
    let result: RevertResult = serde_wasm_bindgen::from_value(result).expect("deserialize result");
    assert!(!result.from_payload);
    assert_eq!(result.markdown, "1. one\n\n2. two\n");
}

#[wasm_bindgen_test]
fn revert_to_html_honours_put_breaks() {
    let html = revert_field_to_html("<div>a</div><div></div>", js(r#"{"putBreaks": true}"#))
        .expect("revert should succeed");
    assert_eq!(html, "<div>a</div><div><br /></div>");
}

#[wasm_bindgen_test]
fn text_helpers_match_core() {
    assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    assert_eq!(
        strip_html("<div>- aaa</div>", false).expect("strip should succeed"),
        "- aaa\n"
    );
    assert_eq!(clean_markdown_to_html("    x", false), "<div>&nbsp; &nbsp; x</div>");
    assert_eq!(extract_payload("<div></div><!----SBAdata:randomtext---->"), "randomtext");
}

#[wasm_bindgen_test]
fn keybindings_are_normalized_per_platform() {
    assert_eq!(normalize_keybinding("p-Alt-Ctrl", Some("linux".into())), "ctrl+alt+p");
    assert_eq!(normalize_keybinding("Q-Meta-CTRL", Some("darwin".into())), "ctrl+meta+q");
    assert_eq!(normalize_keybinding("Q-Meta-CTRL", Some("win32".into())), "");
}

#[wasm_bindgen_test]
fn user_keybindings_fall_back_to_defaults() {
    let checked = check_user_keybindings(
        js(r#"{"bold": "ctrl+b", "code": "ctrl+alt+c"}"#),
        js(r#"{"bold": "B-Ctrl", "code": "alt+shift+ctrl"}"#),
        Some("linux".into()),
    )
    .expect("check should succeed");
    let checked: BTreeMap<String, String> =
        serde_wasm_bindgen::from_value(checked).expect("deserialize result");
    assert_eq!(checked.get("bold").map(String::as_str), Some("ctrl+b"));
    assert_eq!(checked.get("code").map(String::as_str), Some("ctrl+alt+c"));
}

#[wasm_bindgen_test]
fn user_prefs_keep_default_keys() {
    let prefs = normalize_user_prefs(js(r#"{"a": 1, "b": 2}"#), js(r#"{"a": 5, "c": 3}"#))
        .expect("normalize should succeed");
    let prefs: BTreeMap<String, i64> =
        serde_wasm_bindgen::from_value(prefs).expect("deserialize result");
    assert_eq!(prefs, BTreeMap::from([("a".to_string(), 5), ("b".to_string(), 2)]));
}
