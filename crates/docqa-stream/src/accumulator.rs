use tracing::trace;

use crate::payload::PayloadIncrement;
use crate::render::{Formatter, RenderSurface};

/// Builds the answer text from increments and re-renders it in full
///
/// Markup renderers are not incremental-safe, so each increment renders the
/// whole accumulated source rather than appending a rendered fragment.
pub struct ResponseAccumulator<F> {
    text: String,
    formatter: F,
    renders: usize,
}

impl<F: Formatter> ResponseAccumulator<F> {
    pub fn new(formatter: F) -> Self {
        Self {
            text: String::new(),
            formatter,
            renders: 0,
        }
    }

    /// Apply one increment. Returns true when the text changed and the
    /// surface was re-rendered; `done` increments never mutate the text.
    pub fn apply<S>(&mut self, increment: PayloadIncrement, surface: &mut S) -> bool
    where
        S: RenderSurface + ?Sized,
    {
        if increment.done {
            trace!("End-of-turn increment received");
            return false;
        }

        self.text.push_str(&increment.content);
        surface.render(&self.formatter.format(&self.text));
        surface.scroll_to_bottom();
        self.renders += 1;
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Number of renders performed so far
    pub fn renders(&self) -> usize {
        self.renders
    }
}
