//! HTML character-entity escaping.

/// Escape `&`, `"`, `'`, `<` and `>` as named entities.
///
/// Single left-to-right pass over the input; replacement text is never
/// re-scanned, so `&` is escaped exactly once.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build an anchor element. Neither argument is escaped.
pub fn create_anchor(url: &str, text: &str) -> String {
    format!("<a href=\"{url}\">{text}</a>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five_characters() {
        assert_eq!(
            escape_html("this&that\"so'and<and>"),
            "this&amp;that&quot;so&apos;and&lt;and&gt;"
        );
    }

    #[test]
    fn escapes_every_ampersand_once() {
        assert_eq!(escape_html("this&that&so"), "this&amp;that&amp;so");
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn keeps_non_ascii_text() {
        assert_eq!(escape_html("об этом & о том"), "об этом &amp; о том");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn each_character_maps_to_a_distinct_entity() {
        let escaped: Vec<String> = ["&", "\"", "'", "<", ">"].iter().map(|c| escape_html(c)).collect();
        assert_eq!(escaped, vec!["&amp;", "&quot;", "&apos;", "&lt;", "&gt;"]);
    }

    #[test]
    fn anchor_wraps_url_and_text_verbatim() {
        assert_eq!(create_anchor("", "random"), "<a href=\"\">random</a>");
        assert_eq!(
            create_anchor("ничё, пацаны", "random"),
            "<a href=\"ничё, пацаны\">random</a>"
        );
        assert_eq!(create_anchor("</a>", "random"), "<a href=\"</a>\">random</a>");
    }
}
