//! Generic noise stripping for rendered HTML.
//!
//! Removes script/nav/ad furniture while preserving semantic structure.
//! Elements recognized as primary content containers are never removed,
//! even when their class or id also matches a noise pattern.

use dom_query::{Document, Selection};

/// Tags that never carry article content.
const NOISE_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "nav", "header", "footer",
    "aside", "form", "button", "svg", "select", "option", "input", "label",
    "video", "audio",
];

/// Class/id substrings that mark boilerplate blocks.
const NOISE_PATTERNS: &[&str] = &[
    "navbar", "navigation", "menu", "sidebar", "banner", "advert", "adsense",
    "sponsor", "promo", "social", "share", "comment", "cookie", "popup",
    "modal", "subscribe", "newsletter", "related", "breadcrumb", "footer",
    "header-bar", "toolbar", "pagination",
];

/// Class/id substrings that mark primary content containers. Matching
/// elements are exempt from pattern-based removal.
const CONTENT_MARKERS: &[&str] = &[
    "content", "article", "main", "post", "entry", "story", "text", "body",
];

/// Strip known noise from an HTML document, returning the cleaned markup.
///
/// Tag-level removal happens first; class/id pattern removal runs after,
/// guarded by [`CONTENT_MARKERS`].
pub fn strip_noise(html: &str) -> String {
    let doc = Document::from(html);

    doc.select(&NOISE_TAGS.join(",")).remove();

    // Collect first: removing while iterating invalidates the selection.
    let flagged = doc.select("[class], [id]").nodes().to_vec();
    for node in flagged {
        let sel = Selection::from(node);
        let haystack = format!(
            "{} {}",
            sel.attr_or("class", ""),
            sel.attr_or("id", "")
        )
        .to_lowercase();

        if CONTENT_MARKERS.iter().any(|m| haystack.contains(m)) {
            continue;
        }
        if NOISE_PATTERNS.iter().any(|p| haystack.contains(p)) {
            sel.remove();
        }
    }

    let body = doc.select("body");
    if body.length() > 0 {
        body.html().to_string()
    } else {
        doc.html().to_string()
    }
}
