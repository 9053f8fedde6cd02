//! Conversions between editor field HTML and plain Markdown text.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fieldmark_core::escape_html;
use lol_html::html_content::{ContentType, EndTag};
use lol_html::{
    ElementContentHandlers, RewriteStrSettings, Selector, doc_text, element, rewrite_str,
};

use crate::error::FieldError;

const NBSP: char = '\u{a0}';

/// Elements whose start and end tags delimit lines. `br` is handled separately.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// Accumulates stripped lines as rewriter events arrive.
#[derive(Debug, Default)]
struct LineCollector {
    lines: Vec<String>,
    current: String,
    open: bool,
}

impl LineCollector {
    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        // Newline-bearing whitespace between blocks is layout, not content.
        let layout = raw.contains('\n') && raw.chars().all(|c| c.is_ascii_whitespace());
        if self.current.is_empty() && layout {
            return;
        }
        self.current.push_str(&html_escape::decode_html_entities(raw));
        self.open = true;
    }

    fn block_start(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.open = true;
    }

    fn block_end(&mut self) {
        if self.open {
            self.lines.push(std::mem::take(&mut self.current));
            self.open = false;
        }
    }

    fn line_break(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
        self.open = false;
    }

    fn finish(mut self, keep_empty_lines: bool) -> String {
        if self.open {
            self.lines.push(std::mem::take(&mut self.current));
        }
        let lines: Vec<String> = self.lines.iter().map(|line| normalize_leading_nbsp(line)).collect();
        if lines.is_empty() {
            return String::new();
        }
        if keep_empty_lines {
            let mut out = lines.join("\n\n");
            out.push('\n');
            out
        } else {
            lines.iter().map(|line| format!("{line}\n")).collect()
        }
    }
}

/// Leading non-breaking spaces become ordinary spaces.
fn normalize_leading_nbsp(line: &str) -> String {
    let content_at = line
        .find(|c: char| c != NBSP && c != ' ' && c != '\t')
        .unwrap_or(line.len());
    let (indent, content) = line.split_at(content_at);
    let mut out: String = indent.chars().map(|c| if c == NBSP { ' ' } else { c }).collect();
    out.push_str(content);
    out
}

type Handler = (Cow<'static, Selector>, ElementContentHandlers<'static>);

fn line_boundary_handler(sink: Rc<RefCell<LineCollector>>) -> Handler {
    element!("*", move |el| {
        let name = el.tag_name().to_ascii_lowercase();
        if name == "br" {
            sink.borrow_mut().line_break();
            return Ok(());
        }
        if !BLOCK_TAGS.contains(&name.as_str()) {
            return Ok(());
        }

        sink.borrow_mut().block_start();
        if let Some(handlers) = el.end_tag_handlers() {
            let sink = Rc::clone(&sink);
            handlers.push(Box::new(move |_end: &mut EndTag<'_>| {
                sink.borrow_mut().block_end();
                Ok(())
            }) as lol_html::EndTagHandler<'static>);
        }
        Ok(())
    })
}

/// Recover the Markdown a user typed into a rich-text field.
///
/// Block elements and `<br>` delimit lines, every other tag and comment is
/// dropped, and entities are decoded. Markdown punctuation is kept verbatim.
/// Each line is terminated by `\n`; with `keep_empty_lines` consecutive lines
/// are separated by a blank line instead.
pub fn strip_html_to_markdown(html: &str, keep_empty_lines: bool) -> Result<String, FieldError> {
    if html.is_empty() {
        return Ok(String::new());
    }
    let collector = Rc::new(RefCell::new(LineCollector::default()));
    let text_sink = Rc::clone(&collector);
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![line_boundary_handler(Rc::clone(&collector))],
            document_content_handlers: vec![doc_text!(move |chunk| {
                text_sink.borrow_mut().text(chunk.as_str());
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(collector.take().finish(keep_empty_lines))
}

/// Wrap clean Markdown in one `<div>` per line for display in the editor.
///
/// Leading spaces are kept visible as `&nbsp; ` pairs. Whitespace-only lines
/// become `<div><br /></div>`; empty lines become `<div></div>`, or the
/// `<br />` form when `put_breaks` is set.
pub fn clean_markdown_to_html(markdown: &str, put_breaks: bool) -> String {
    let mut out = String::with_capacity(markdown.len() * 2);

    for line in markdown.lines() {
        out.push_str("<div>");
        if line.is_empty() {
            if put_breaks {
                out.push_str("<br />");
            }
        } else if line.trim().is_empty() {
            out.push_str("<br />");
        } else {
            let content = line.trim_start_matches(' ');
            let indent = line.len() - content.len();
            for _ in 0..indent / 2 {
                out.push_str("&nbsp; ");
            }
            if indent % 2 == 1 {
                out.push_str("&nbsp;");
            }
            out.push_str(&escape_html(content));
        }
        out.push_str("</div>");
    }

    out
}

fn definition_term_handler(after_term: Rc<Cell<bool>>) -> Handler {
    element!("dt", move |_el| {
        after_term.set(true);
        Ok(())
    })
}

fn definition_handler(after_term: Rc<Cell<bool>>) -> Handler {
    element!("dd", move |el| {
        if after_term.replace(false) {
            el.prepend(": ", ContentType::Text);
        }
        Ok(())
    })
}

/// Prefix each `<dd>` that directly follows a `<dt>` with `": "`, restoring
/// the Markdown definition syntax before the HTML is stripped.
pub fn put_colons_in_html_def_list(html: &str) -> Result<String, FieldError> {
    if html.is_empty() {
        return Ok(String::new());
    }
    let after_term = Rc::new(Cell::new(false));
    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                definition_term_handler(Rc::clone(&after_term)),
                definition_handler(after_term),
            ],
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(output)
}
