use std::sync::Arc;

/// Converts accumulated source text into display markup.
///
/// Implementations must be pure: the same source always yields the same
/// markup, and a partial document (an unterminated emphasis marker, say)
/// must still render to something displayable.
pub trait Formatter: Send + Sync {
    fn format(&self, source: &str) -> String;
}

/// Formatter that displays the source as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl Formatter for PlainText {
    fn format(&self, source: &str) -> String {
        source.to_string()
    }
}

impl<F: Formatter + ?Sized> Formatter for Arc<F> {
    fn format(&self, source: &str) -> String {
        (**self).format(source)
    }
}

/// Display element that receives the rendered answer
pub trait RenderSurface {
    /// Replace the element's content with `markup`
    fn render(&mut self, markup: &str);

    /// Move the enclosing view so the latest content is visible
    fn scroll_to_bottom(&mut self);
}
