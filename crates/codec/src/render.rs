//! Markdown to HTML rendering.

use crate::error::FieldError;

/// CommonMark + GFM, passing raw HTML through since fields routinely mix
/// Markdown with inline markup.
fn render_options() -> markdown::Options {
    let mut options = markdown::Options::gfm();
    options.compile.allow_dangerous_html = true;
    options
}

/// Render Markdown to HTML.
pub fn render_markdown(markdown: &str) -> Result<String, FieldError> {
    Ok(markdown::to_html_with_options(markdown, &render_options())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_commonmark() {
        let html = render_markdown("# Title\n\nSome *text*.").unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn renders_gfm_tables_and_strikethrough() {
        let html = render_markdown("| a | b |\n|:-:|--:|\n| 1 | 2 |\n\n~~gone~~").unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn raw_html_passes_through() {
        let html = render_markdown("<span class=\"x\">kept</span>").unwrap();
        assert!(html.contains("<span class=\"x\">kept</span>"));
    }

    #[test]
    fn encoded_image_target_renders_as_image() {
        let html = render_markdown("![cat](cat&#32;&#40;1&#41;.jpg)").unwrap();
        assert!(html.contains("<img src=\"cat%20(1).jpg\""));
    }
}
