//! Markdown to HTML rendering.

use std::sync::LazyLock;

use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

/// First ATX level-1 heading.
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

/// Parser options with GitHub Flavored Markdown extensions.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Render markdown text to HTML.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Text of the first `# Heading` line, if any.
#[must_use]
pub fn extract_h1_title(markdown: &str) -> Option<String> {
    let caps = H1_RE.captures(markdown)?;
    let title = caps[1].trim().trim_end_matches('#').trim_end();
    (!title.is_empty()).then(|| title.to_owned())
}

/// Title derived from a URL slug (`getting-started` → `Getting Started`).
#[must_use]
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Escape text for inclusion in HTML.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_paragraph() {
        assert_eq!(render_markdown("hello *world*"), "<p>hello <em>world</em></p>\n");
    }

    #[test]
    fn test_render_gfm_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_render_strikethrough() {
        assert!(render_markdown("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn test_extract_h1_title() {
        let md = "Intro line\n\n# Getting Started\n\n## Details\n# Second";
        assert_eq!(extract_h1_title(md), Some("Getting Started".to_owned()));
    }

    #[test]
    fn test_extract_h1_ignores_h2() {
        assert_eq!(extract_h1_title("## Only H2\ntext"), None);
    }

    #[test]
    fn test_extract_h1_closing_hashes() {
        assert_eq!(extract_h1_title("# Title #"), Some("Title".to_owned()));
    }

    #[test]
    fn test_titlecase_from_slug() {
        assert_eq!(titlecase_from_slug("getting-started"), "Getting Started");
        assert_eq!(titlecase_from_slug("api_reference"), "Api Reference");
        assert_eq!(titlecase_from_slug(""), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;");
    }
}
