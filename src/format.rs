//! Turns a model's freeform reply into an HTML fragment.
//!
//! The model gives no reliable structure, so each line is classified on its
//! own shape: headings end in a colon, `- ` starts a bullet, and capitalised
//! sentences after the opening one are read as implicit bullets.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][^:]*:$").expect("valid heading regex"));

static IMPLICIT_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z].*\.$").expect("valid implicit bullet regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListTag {
    Unordered,
}

impl ListTag {
    fn name(self) -> &'static str {
        match self {
            ListTag::Unordered => "ul",
        }
    }
}

struct Fragments {
    lines: Vec<String>,
    open_list: Option<ListTag>,
    first_paragraph_done: bool,
}

impl Fragments {
    fn close_list(&mut self) {
        if let Some(tag) = self.open_list.take() {
            self.lines.push(format!("</{}>", tag.name()));
        }
    }

    fn ensure_list(&mut self, tag: ListTag) {
        if self.open_list != Some(tag) {
            self.close_list();
            self.lines.push(format!("<{}>", tag.name()));
            self.open_list = Some(tag);
        }
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

pub fn format_summary(text: &str) -> String {
    let text = BOLD.replace_all(text, "<strong>${1}</strong>");

    let mut out = Fragments {
        lines: Vec::new(),
        open_list: None,
        first_paragraph_done: false,
    };

    for raw in text.split('\n') {
        let line = raw.trim();

        if line.is_empty() {
            if out.open_list.is_none() {
                out.push(String::new());
            }
            continue;
        }

        if HEADING.is_match(line) {
            out.close_list();
            out.push(format!("<h3>{}</h3>", &line[..line.len() - 1]));
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            out.ensure_list(ListTag::Unordered);
            out.push(format!("<li>{}</li>", item));
            continue;
        }

        if out.open_list.is_none() && IMPLICIT_BULLET.is_match(line) {
            // The opening sentence is prose, not the first item of a list.
            if !out.first_paragraph_done {
                out.first_paragraph_done = true;
                out.push(format!("<p>{}</p>", line));
                continue;
            }
            out.ensure_list(ListTag::Unordered);
            out.push(format!("<li>{}</li>", line));
            continue;
        }

        out.close_list();
        out.push(format!("<p>{}</p>", line));
        out.first_paragraph_done = true;
    }

    out.close_list();
    out.lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_then_bullets() {
        assert_eq!(
            format_summary("Key Points:\n- One\n- Two"),
            "<h3>Key Points</h3>\n<ul>\n<li>One</li>\n<li>Two</li>\n</ul>"
        );
    }

    #[test]
    fn test_bold_spans() {
        let html = format_summary("This is **very** important and **bold**");
        assert_eq!(
            html,
            "<p>This is <strong>very</strong> important and <strong>bold</strong></p>"
        );
        assert!(!html.contains("**"));
    }

    #[test]
    fn test_bold_does_not_cross_lines() {
        assert_eq!(format_summary("**open\nclose**"), "<p>**open</p>\n<p>close**</p>");
    }

    #[test]
    fn test_single_sentence_is_paragraph() {
        assert_eq!(format_summary("Summary."), "<p>Summary.</p>");
        assert_eq!(
            format_summary("Failed to summarize the provided URL."),
            "<p>Failed to summarize the provided URL.</p>"
        );
    }

    #[test]
    fn test_implicit_bullets_after_opening_sentence() {
        assert_eq!(
            format_summary("Overview of the page\nFirst fact.\nThen more words"),
            "<p>Overview of the page</p>\n<ul>\n<li>First fact.</li>\n</ul>\n<p>Then more words</p>"
        );
    }

    #[test]
    fn test_implicit_bullet_inside_list_falls_through_to_paragraph() {
        assert_eq!(
            format_summary("Intro sentence.\nSecond point.\nThird point."),
            "<p>Intro sentence.</p>\n<ul>\n<li>Second point.</li>\n</ul>\n<p>Third point.</p>"
        );
    }

    #[test]
    fn test_explicit_bullets_continue_implicit_list() {
        assert_eq!(
            format_summary("Intro.\nImplied item.\n- Explicit item"),
            "<p>Intro.</p>\n<ul>\n<li>Implied item.</li>\n<li>Explicit item</li>\n</ul>"
        );
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(format_summary("a line\n\nb line"), "<p>a line</p>\n\n<p>b line</p>");
        assert_eq!(
            format_summary("- a\n\n- b"),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn test_heading_closes_list() {
        assert_eq!(
            format_summary("- a\nDetails:\n- b"),
            "<ul>\n<li>a</li>\n</ul>\n<h3>Details</h3>\n<ul>\n<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn test_heading_shape() {
        // A colon before the end, a lowercase start, or bold markup all disqualify.
        assert_eq!(format_summary("Note: see below:"), "<p>Note: see below:</p>");
        assert_eq!(format_summary("summary:"), "<p>summary:</p>");
        assert_eq!(
            format_summary("**Key Points:**"),
            "<p><strong>Key Points:</strong></p>"
        );
    }

    #[test]
    fn test_lines_are_trimmed() {
        assert_eq!(
            format_summary("  Key Points:  \r\n   - One\r\n"),
            "<h3>Key Points</h3>\n<ul>\n<li>One</li>\n</ul>"
        );
    }

    #[test]
    fn test_byte_order_mark_is_not_trimmed() {
        assert_eq!(
            format_summary("\u{FEFF}Key Points:"),
            "<p>\u{FEFF}Key Points:</p>"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_summary(""), "");
    }
}
