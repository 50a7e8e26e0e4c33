use std::io::Write;
use tracing::warn;

use docqa_client::{ConversationView, DocumentListView, DocumentRecord, ResponseId, Role, StatusLine};

/// Line-oriented terminal implementation of every view the client drives
///
/// Answers are re-rendered in full on every increment; when the new
/// rendering extends what is already on screen only the new suffix is
/// printed, otherwise the answer is printed again on a fresh line.
pub struct TerminalView<W: Write> {
    out: W,
    shown: Option<(ResponseId, String)>,
    next_id: usize,
    line_open: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: None,
            next_id: 0,
            line_open: false,
        }
    }

    pub fn prompt(&mut self) {
        self.finish_line();
        self.emit("> ");
        self.flush();
    }

    pub fn print_line(&mut self, text: &str) {
        self.finish_line();
        self.emit(text);
        self.emit("\n");
        self.flush();
    }

    /// Terminate a partially printed answer line
    pub fn finish_line(&mut self) {
        if self.line_open {
            self.emit("\n");
            self.line_open = false;
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!("Failed to flush terminal: {}", e);
        }
    }
}

impl<W: Write> ConversationView for TerminalView<W> {
    fn append_message(&mut self, role: Role, text: &str) {
        self.finish_line();
        let line = match role {
            Role::User => format!("You: {}\n", text),
            Role::Bot => format!("{}\n", text),
        };
        self.emit(&line);
        self.flush();
    }

    fn begin_response(&mut self) -> ResponseId {
        self.finish_line();
        let id = ResponseId(self.next_id);
        self.next_id += 1;

        self.emit("Bot: ");
        self.line_open = true;
        self.shown = Some((id, String::new()));
        id
    }

    fn render_response(&mut self, id: ResponseId, markup: &str) {
        let suffix = match &self.shown {
            Some((shown_id, shown)) if *shown_id == id && markup.starts_with(shown.as_str()) => {
                markup[shown.len()..].to_string()
            }
            _ => {
                self.finish_line();
                self.line_open = true;
                format!("Bot: {}", markup)
            }
        };

        self.emit(&suffix);
        self.shown = Some((id, markup.to_string()));
    }

    fn scroll_to_bottom(&mut self) {
        self.flush();
    }
}

impl<W: Write> DocumentListView for TerminalView<W> {
    fn clear(&mut self) {
        self.finish_line();
        self.emit("Documents:\n");
    }

    fn push_document(&mut self, record: &DocumentRecord) {
        let line = format!("  - {}  ({})\n", record.filename, record.display_time());
        self.emit(&line);
    }

    fn show_placeholder(&mut self, text: &str) {
        let line = format!("  {}\n", text);
        self.emit(&line);
        self.flush();
    }
}

impl<W: Write> StatusLine for TerminalView<W> {
    fn set_status(&mut self, text: &str) {
        self.finish_line();
        let line = format!("[upload] {}\n", text);
        self.emit(&line);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_incremental_render_prints_suffix() {
        let mut view = TerminalView::new(Vec::new());
        view.append_message(Role::User, "hello");
        let id = view.begin_response();
        view.render_response(id, "Hi");
        view.render_response(id, "Hi there");
        view.finish_line();

        assert_eq!(output(view), "You: hello\nBot: Hi there\n");
    }

    #[test]
    fn test_non_prefix_render_redraws() {
        let mut view = TerminalView::new(Vec::new());
        let id = view.begin_response();
        view.render_response(id, "<p>Hi</p>");
        view.render_response(id, "<p>Hi there</p>");
        view.finish_line();

        assert_eq!(output(view), "Bot: <p>Hi</p>\nBot: <p>Hi there</p>\n");
    }

    #[test]
    fn test_error_after_partial_answer_starts_new_line() {
        let mut view = TerminalView::new(Vec::new());
        let id = view.begin_response();
        view.render_response(id, "partial");
        view.append_message(Role::Bot, "failed");

        assert_eq!(output(view), "Bot: partial\nfailed\n");
    }

    #[test]
    fn test_document_list() {
        let mut view = TerminalView::new(Vec::new());
        view.clear();
        view.push_document(&DocumentRecord {
            id: Some(1),
            filename: "guide.pdf".to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
        });

        let text = output(view);
        assert!(text.starts_with("Documents:\n  - guide.pdf  ("));
    }

    #[test]
    fn test_document_without_timestamp() {
        let mut view = TerminalView::new(Vec::new());
        view.push_document(&DocumentRecord {
            id: None,
            filename: "scan.pdf".to_string(),
            created_at: None,
        });

        assert_eq!(output(view), "  - scan.pdf  (unknown)\n");
    }

    #[test]
    fn test_placeholder() {
        let mut view = TerminalView::new(Vec::new());
        view.clear();
        view.show_placeholder("No documents uploaded yet.");

        assert_eq!(output(view), "Documents:\n  No documents uploaded yet.\n");
    }
}
