//! Mechanical HTML to Markdown conversion and Markdown normalization.
//!
//! Output uses ATX-style headings and hyphen bullets. This is the guaranteed
//! last tier of the extraction chain, so it must never fail; anything it
//! cannot convert is stripped rather than passed through.

use regex::Regex;

/// Convert HTML to Markdown.
pub fn html_to_markdown(html: &str) -> String {
    let mut text = html.to_string();

    // Remove non-content containers that survived upstream cleaning,
    // content included.
    for tag in ["script", "style", "nav", "header", "footer", "aside", "form", "button"] {
        let pattern = Regex::new(&format!(r"(?is)<{tag}[^>]*>.*?</{tag}>")).unwrap();
        text = pattern.replace_all(&text, "").to_string();
    }

    // ATX headings, h1 through h6.
    for level in 1..=6 {
        let pattern = Regex::new(&format!(r"(?is)<h{level}[^>]*>(.*?)</h{level}>")).unwrap();
        let hashes = "#".repeat(level);
        text = pattern
            .replace_all(&text, format!("\n{hashes} $1\n"))
            .to_string();
    }

    // Paragraphs and line breaks.
    let p_pattern = Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap();
    let br_pattern = Regex::new(r"(?i)<br\s*/?>").unwrap();
    text = p_pattern.replace_all(&text, "\n$1\n").to_string();
    text = br_pattern.replace_all(&text, "\n").to_string();

    // Emphasis.
    let strong_pattern = Regex::new(r"(?is)<(?:strong|b)[^>]*>(.*?)</(?:strong|b)>").unwrap();
    let em_pattern = Regex::new(r"(?is)<(?:em|i)[^>]*>(.*?)</(?:em|i)>").unwrap();
    text = strong_pattern.replace_all(&text, "**$1**").to_string();
    text = em_pattern.replace_all(&text, "*$1*").to_string();

    // Links.
    let link_pattern =
        Regex::new(r#"(?is)<a[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#).unwrap();
    text = link_pattern.replace_all(&text, "[$2]($1)").to_string();

    // Hyphen bullets.
    let li_pattern = Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap();
    text = li_pattern.replace_all(&text, "\n- $1").to_string();

    // Blockquotes.
    let quote_pattern = Regex::new(r"(?is)<blockquote[^>]*>(.*?)</blockquote>").unwrap();
    text = quote_pattern.replace_all(&text, "\n> $1\n").to_string();

    // Drop every remaining tag.
    let tag_pattern = Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, "").to_string();

    // Decode common HTML entities.
    text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    text.trim().to_string()
}

/// Normalize a Markdown string for downstream consumption.
///
/// Collapses runs of three or more newlines to one blank line, strips known
/// boilerplate phrases case-insensitively, and trims outer whitespace.
pub fn normalize_markdown(content: &str) -> String {
    let mut content = content.to_string();

    let boilerplate = [
        r"(?i)\[?skip to content\]?",
        r"(?i)\[?skip to navigation\]?",
        r"(?i)\[?skip to main content\]?",
    ];
    for phrase in boilerplate {
        content = Regex::new(phrase).unwrap().replace_all(&content, "").to_string();
    }

    let multi_newline = Regex::new(r"\n{3,}").unwrap();
    content = multi_newline.replace_all(&content, "\n\n").to_string();

    content.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atx_headings() {
        let md = html_to_markdown("<h1>Title</h1><h2>Sub</h2><h3>Deep</h3>");
        assert!(md.contains("# Title"));
        assert!(md.contains("## Sub"));
        assert!(md.contains("### Deep"));
    }

    #[test]
    fn test_links_and_bullets() {
        let md = html_to_markdown(
            r#"<ul><li>First</li><li><a href="https://example.com">Link</a></li></ul>"#,
        );
        assert!(md.contains("- First"));
        assert!(md.contains("- [Link](https://example.com)"));
    }

    #[test]
    fn test_emphasis_and_entities() {
        let md = html_to_markdown("<p><strong>Bold</strong> &amp; <em>italic</em></p>");
        assert!(md.contains("**Bold** & *italic*"));
    }

    #[test]
    fn test_container_chrome_removed_with_content() {
        let md = html_to_markdown(
            "<nav><a href=\"/\">Home</a></nav><p>Kept.</p><footer>Legal</footer>",
        );
        assert_eq!(md, "Kept.");
    }

    #[test]
    fn test_remaining_tags_stripped() {
        let md = html_to_markdown("<section><p>Text</p><canvas></canvas></section>");
        assert_eq!(md, "Text");
    }

    #[test]
    fn test_normalize_collapses_blank_lines() {
        let normalized = normalize_markdown("a\n\n\n\n\nb");
        assert_eq!(normalized, "a\n\nb");
    }

    #[test]
    fn test_normalize_strips_boilerplate() {
        let normalized = normalize_markdown("[Skip to content]\n\nArticle body");
        assert_eq!(normalized, "Article body");

        let normalized = normalize_markdown("SKIP TO NAVIGATION\nArticle body");
        assert_eq!(normalized, "Article body");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_markdown("  \n text \n  "), "text");
    }
}
