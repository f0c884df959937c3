//! Regex-based reduction of a fetched page to a bounded plain-text excerpt.
//!
//! This is pattern scanning, not parsing: a stray `<script` inside an
//! attribute or an unterminated block can leave residue in the output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound, in characters, on the text sent for summarization.
pub const MAX_EXTRACT_CHARS: usize = 4000;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script regex"));

static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid style regex"));

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub fn extract_text(html: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, " ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");

    text.trim().chars().take(MAX_EXTRACT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_scripts_and_tags() {
        let text = extract_text("<script>bad()</script><p>Hello   World</p>");
        assert_eq!(text, "Hello World");
    }

    #[test]
    fn test_strips_styles_case_insensitive() {
        let html = "<STYLE type=\"text/css\">\nbody { color: red; }\n</STYLE><div>Kept</div><Script src=x>\nlet a = 1;\n</SCRIPT>";
        assert_eq!(extract_text(html), "Kept");
    }

    #[test]
    fn test_tags_become_word_separators() {
        let html = "<html><body><h1>Title</h1><p>Content.</p></body></html>";
        assert_eq!(extract_text(html), "Title Content.");
    }

    #[test]
    fn test_multiple_blocks_removed_non_greedily() {
        let html = "<script>a()</script>between<script>b()</script>";
        assert_eq!(extract_text(html), "between");
    }

    #[test]
    fn test_unterminated_script_leaks_content() {
        // No closing tag, so only the opening tag itself is stripped.
        assert_eq!(extract_text("<script>leak()<p>x</p>"), "leak() x");
    }

    #[test]
    fn test_truncates_to_limit() {
        let input = "a".repeat(10_000);
        let text = extract_text(&input);
        assert_eq!(text.chars().count(), MAX_EXTRACT_CHARS);
        assert_eq!(text, input[..MAX_EXTRACT_CHARS]);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let input = "é".repeat(5_000);
        let text = extract_text(&input);
        assert_eq!(text.chars().count(), MAX_EXTRACT_CHARS);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_text(""), "");
        assert_eq!(extract_text("   <br/>  \n\t "), "");
    }
}
