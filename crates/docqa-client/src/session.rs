use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use docqa_stream::{Formatter, RenderSurface, ResponseAccumulator, SseDecoder};

use crate::control::ActionControl;
use crate::error::SessionError;
use crate::traits::DocumentClient;
use crate::view::{ConversationView, ResponseId, ResponseSurface, Role};

/// Prefix of the inline entry reporting a failed session
pub const ERROR_PREFIX: &str = "❌ An error occurred: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

/// One query's request/stream/render cycle
///
/// Owns the decode carry-over state and the accumulated answer for as long
/// as the response is being read.
pub struct StreamSession {
    query: String,
    state: SessionState,
    decoder: SseDecoder,
    accumulator: ResponseAccumulator<Arc<dyn Formatter>>,
    skipped_frames: usize,
}

impl StreamSession {
    pub fn new(query: impl Into<String>, formatter: Arc<dyn Formatter>) -> Self {
        Self {
            query: query.into(),
            state: SessionState::Idle,
            decoder: SseDecoder::new(),
            accumulator: ResponseAccumulator::new(formatter),
            skipped_frames: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn text(&self) -> &str {
        self.accumulator.text()
    }

    /// Complete frames read so far, data or not
    pub fn frames_seen(&self) -> usize {
        self.decoder.frames_seen()
    }

    /// Times the answer was re-rendered
    pub fn renders(&self) -> usize {
        self.accumulator.renders()
    }

    /// Frames dropped because their payload failed to parse
    pub fn skipped_frames(&self) -> usize {
        self.skipped_frames
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Decode, split, parse and render one transport chunk
    pub fn consume_chunk<S>(&mut self, bytes: &[u8], surface: &mut S)
    where
        S: RenderSurface + ?Sized,
    {
        debug!("Received chunk of {} bytes", bytes.len());
        let results = self.decoder.feed(bytes);
        self.apply_results(results, surface);
    }

    /// Transport end-of-stream: flush whatever the decoder still holds
    pub fn finish_stream<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface + ?Sized,
    {
        let results = self.decoder.finish();
        self.apply_results(results, surface);
    }

    fn apply_results<S>(&mut self, results: Vec<docqa_stream::Result<docqa_stream::PayloadIncrement>>, surface: &mut S)
    where
        S: RenderSurface + ?Sized,
    {
        for result in results {
            match result {
                Ok(increment) => {
                    self.accumulator.apply(increment, surface);
                }
                Err(e) => {
                    self.skipped_frames += 1;
                    warn!("Skipping frame: {}", e);
                }
            }
        }
    }
}

/// How a submission ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// Blank query; nothing happened
    Ignored,
    /// Another session holds the action control
    Rejected,
    Completed { text: String },
    Failed { error: SessionError, text: String },
}

impl SessionOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            SessionOutcome::Completed { text } | SessionOutcome::Failed { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Drives chat sessions against a `DocumentClient`
///
/// Reference-source lookups run as side tasks in a `JoinSet`: their errors
/// are logged inside the task and a session never waits for them.
pub struct SessionController {
    client: Arc<dyn DocumentClient>,
    formatter: Arc<dyn Formatter>,
    side_tasks: JoinSet<()>,
}

impl SessionController {
    pub fn new(client: Arc<dyn DocumentClient>, formatter: Arc<dyn Formatter>) -> Self {
        Self {
            client,
            formatter,
            side_tasks: JoinSet::new(),
        }
    }

    /// Submit a query and stream its answer into `view`.
    ///
    /// `control` is disabled for the whole session and re-enabled on every
    /// exit path. Submitting while it is held is rejected.
    pub async fn submit<V>(&mut self, query: &str, view: &mut V, control: &ActionControl) -> SessionOutcome
    where
        V: ConversationView + ?Sized,
    {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank query");
            return SessionOutcome::Ignored;
        }

        let Some(_guard) = control.try_acquire() else {
            warn!("Rejecting query while another session is running");
            return SessionOutcome::Rejected;
        };

        self.reap_side_tasks();

        let mut session = StreamSession::new(query, Arc::clone(&self.formatter));
        session.transition(SessionState::Requesting);
        info!("Submitting query ({} chars)", query.len());

        self.spawn_source_lookup(query);

        view.append_message(Role::User, query);
        let response_id = view.begin_response();

        match stream_response(self.client.as_ref(), &mut session, view, response_id).await {
            Ok(()) => {
                session.transition(SessionState::Completed);
                view.scroll_to_bottom();
                info!(
                    "Session completed: {} chars, {} frames, {} renders, {} skipped frames",
                    session.text().len(),
                    session.frames_seen(),
                    session.renders(),
                    session.skipped_frames()
                );
                SessionOutcome::Completed {
                    text: session.text().to_string(),
                }
            }
            Err(error) => {
                session.transition(SessionState::Failed);
                warn!("Session failed: {}", error);
                view.append_message(Role::Bot, &format!("{}{}", ERROR_PREFIX, error));
                SessionOutcome::Failed {
                    error,
                    text: session.text().to_string(),
                }
            }
        }
    }

    /// Side tasks still running or not yet reaped
    pub fn pending_side_tasks(&self) -> usize {
        self.side_tasks.len()
    }

    /// Wait for every outstanding side task, e.g. before shutdown
    pub async fn drain_side_tasks(&mut self) {
        while let Some(result) = self.side_tasks.join_next().await {
            if let Err(e) = result {
                warn!("Side task ended abnormally: {}", e);
            }
        }
    }

    fn reap_side_tasks(&mut self) {
        while let Some(result) = self.side_tasks.try_join_next() {
            if let Err(e) = result {
                warn!("Side task ended abnormally: {}", e);
            }
        }
    }

    fn spawn_source_lookup(&mut self, query: &str) {
        let client = Arc::clone(&self.client);
        let query = query.to_string();

        self.side_tasks.spawn(async move {
            match client.search(&query).await {
                Ok(response) => {
                    info!("Reference sources ({}): {:?}", response.results.len(), response.results);
                }
                Err(e) => {
                    warn!("Reference source lookup failed: {}", e);
                }
            }
        });
    }
}

async fn stream_response<V>(
    client: &dyn DocumentClient,
    session: &mut StreamSession,
    view: &mut V,
    response_id: ResponseId,
) -> Result<(), SessionError>
where
    V: ConversationView + ?Sized,
{
    let mut body = client
        .chat_stream(session.query())
        .await
        .map_err(SessionError::NetworkFailure)?;

    session.transition(SessionState::Streaming);
    let mut surface = ResponseSurface::new(view, response_id);

    while let Some(chunk) = body.next().await {
        let bytes = chunk.map_err(SessionError::StreamReadFailure)?;
        session.consume_chunk(&bytes, &mut surface);
    }

    session.finish_stream(&mut surface);
    Ok(())
}
