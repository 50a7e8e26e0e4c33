use docqa_stream::RenderSurface;

use crate::types::DocumentRecord;

/// Author of a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// Handle to a bot-response element allocated in a conversation view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseId(pub usize);

/// The conversation pane
pub trait ConversationView {
    /// Append a plain-text entry and scroll to it
    fn append_message(&mut self, role: Role, text: &str);

    /// Allocate an empty bot-response element to be filled by rendering
    fn begin_response(&mut self) -> ResponseId;

    /// Replace the content of a response element with rendered markup
    fn render_response(&mut self, id: ResponseId, markup: &str);

    fn scroll_to_bottom(&mut self);
}

/// Render surface addressing one response element of a conversation view
pub struct ResponseSurface<'a, V: ?Sized> {
    view: &'a mut V,
    id: ResponseId,
}

impl<'a, V: ConversationView + ?Sized> ResponseSurface<'a, V> {
    pub fn new(view: &'a mut V, id: ResponseId) -> Self {
        Self { view, id }
    }

    pub fn id(&self) -> ResponseId {
        self.id
    }
}

impl<V: ConversationView + ?Sized> RenderSurface for ResponseSurface<'_, V> {
    fn render(&mut self, markup: &str) {
        self.view.render_response(self.id, markup);
    }

    fn scroll_to_bottom(&mut self) {
        self.view.scroll_to_bottom();
    }
}

/// The uploaded-documents pane
pub trait DocumentListView {
    fn clear(&mut self);

    fn push_document(&mut self, record: &DocumentRecord);

    /// Show a single text line instead of entries
    fn show_placeholder(&mut self, text: &str);
}

/// One-line status text, e.g. next to the upload form
pub trait StatusLine {
    fn set_status(&mut self, text: &str);
}
