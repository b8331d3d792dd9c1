//! Plain-text extraction from rendered wiki HTML

use regex::Regex;
use std::sync::LazyLock;

/// Block-level tags end a line of rendered text.
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:p|div|br|li|ul|ol|dl|dt|dd|h[1-6]|tr|table|blockquote|pre)\b[^>]*?>")
        .expect("block tag pattern")
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("tag pattern"));

static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&\w+;").expect("entity pattern"));

/// First line of text in `html`, with markup and named entities removed.
///
/// Returns `None` for absent or blank input, or when nothing but markup
/// remains after stripping.
pub fn extract_first_line(html: Option<&str>) -> Option<String> {
    let html = html?;
    if html.trim().is_empty() {
        return None;
    }

    let text = BLOCK_TAG.replace_all(html, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = NAMED_ENTITY.replace_all(&text, " ");

    text.trim_start()
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_then_entity() {
        assert_eq!(
            extract_first_line(Some("<p>Home</p>&nbsp;extra")),
            Some("Home".to_string())
        );
    }

    #[test]
    fn test_parser_output_wrapper() {
        let html = "<div class=\"mw-parser-output\"><p>Main Page\n</p>\n<!-- \nNewPP limit report\n--></div>";
        assert_eq!(extract_first_line(Some(html)), Some("Main Page".to_string()));
    }

    #[test]
    fn test_inline_markup_and_entities() {
        assert_eq!(
            extract_first_line(Some("<b>Welcome</b>&amp;<i>Hello</i>\nsecond line")),
            Some("Welcome Hello".to_string())
        );
    }

    #[test]
    fn test_absent_and_blank() {
        assert_eq!(extract_first_line(None), None);
        assert_eq!(extract_first_line(Some("")), None);
        assert_eq!(extract_first_line(Some("  \n\t")), None);
        assert_eq!(extract_first_line(Some("<div></div>")), None);
    }

    #[test]
    fn test_leading_entity_line_is_skipped() {
        assert_eq!(
            extract_first_line(Some("&nbsp;\n<p>Portal</p>")),
            Some("Portal".to_string())
        );
    }
}
