//! Test doubles and fixtures shared by unit and integration tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ai::AI;
use crate::error::{ExtractError, ExtractResult};

/// Scripted [`AI`] implementation.
pub struct MockAi {
    response: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl MockAi {
    /// A mock that always returns the given Markdown.
    pub fn returning(markdown: impl Into<String>) -> Self {
        Self {
            response: Ok(markdown.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock whose every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of extraction calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AI for MockAi {
    async fn extract_markdown(&self, _html: &str, _url: &str) -> ExtractResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(markdown) => Ok(markdown.clone()),
            Err(message) => Err(ExtractError::Ai(message.clone().into())),
        }
    }
}

/// A realistic article page: navigation chrome around a substantial body.
pub fn article_page() -> String {
    let paragraphs: String = (0..8)
        .map(|i| {
            format!(
                "<p>This is the {} paragraph of the article body, long enough \
                 that extraction treats the page as real content rather than \
                 an error page or an empty shell.</p>",
                ordinal(i)
            )
        })
        .collect();

    format!(
        r#"<html>
<head><title>Fixture Article</title></head>
<body>
    <nav class="navbar"><a href="/">Home</a><a href="/about">About</a></nav>
    <div class="sidebar">Trending stories</div>
    <article class="post-content">
        <h1>Fixture Article Title</h1>
        {paragraphs}
    </article>
    <footer>Copyright Fixture Media</footer>
</body>
</html>"#
    )
}

/// A page with nothing extractable: chrome only, no body text to speak of.
pub fn empty_shell_page() -> String {
    r#"<html>
<head><title>Loading...</title></head>
<body>
    <nav class="navbar"><a href="/">Home</a></nav>
    <div id="app"></div>
    <footer>Copyright</footer>
</body>
</html>"#
        .to_string()
}

fn ordinal(i: usize) -> String {
    match i {
        0 => "first".to_string(),
        1 => "second".to_string(),
        2 => "third".to_string(),
        n => format!("{}th", n + 1),
    }
}
