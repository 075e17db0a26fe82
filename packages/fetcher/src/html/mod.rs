//! Pure HTML transforms: noise stripping and Markdown conversion.
//!
//! Nothing in this module performs I/O; the extraction chain composes these
//! functions over the rendered page capture.

pub mod clean;
pub mod markdown;

pub use clean::strip_noise;
pub use markdown::{html_to_markdown, normalize_markdown};
