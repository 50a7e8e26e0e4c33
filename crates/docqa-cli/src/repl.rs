use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use docqa_client::{
    refresh_documents, ActionControl, DocumentClient, PlainText, SessionController, StatusLine,
    UploadController, UploadFile,
};

use crate::terminal::TerminalView;

const HELP: &str = "\
Type a question to query your documents.
  /upload <path>   upload a document
  /docs            list uploaded documents
  /help            show this help
  /quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Upload(PathBuf),
    Documents,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Ask(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "upload" if !arg.is_empty() => Command::Upload(PathBuf::from(arg)),
            "docs" | "documents" => Command::Documents,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Interactive loop over stdin
pub struct Repl<W: Write> {
    client: Arc<dyn DocumentClient>,
    sessions: SessionController,
    uploads: UploadController,
    submit: ActionControl,
    upload: ActionControl,
    view: TerminalView<W>,
}

impl<W: Write> Repl<W> {
    pub fn new(client: Arc<dyn DocumentClient>, out: W) -> Self {
        Self {
            sessions: SessionController::new(Arc::clone(&client), Arc::new(PlainText)),
            uploads: UploadController::new(Arc::clone(&client)),
            client,
            submit: ActionControl::new(),
            upload: ActionControl::new(),
            view: TerminalView::new(out),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        refresh_documents(self.client.as_ref(), &mut self.view).await;
        self.view.print_line(HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.view.prompt();
            let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
                break;
            };

            if !self.handle(Command::parse(&line)).await {
                break;
            }
        }

        self.view.finish_line();
        debug!("Waiting for {} side tasks", self.sessions.pending_side_tasks());
        self.sessions.drain_side_tasks().await;
        info!("Bye");
        Ok(())
    }

    /// Returns false when the loop should stop
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Ask(query) => {
                self.sessions.submit(&query, &mut self.view, &self.submit).await;
                self.view.finish_line();
            }
            Command::Upload(path) => {
                match read_upload(&path).await {
                    Ok(file) => {
                        self.uploads.upload(file, &mut self.view, &self.upload).await;
                    }
                    Err(e) => self.view.set_status(&format!("Upload failed: {:#}", e)),
                }
            }
            Command::Documents => {
                refresh_documents(self.client.as_ref(), &mut self.view).await;
            }
            Command::Help => self.view.print_line(HELP),
            Command::Unknown(line) => {
                self.view.print_line(&format!("Unknown command: {} (try /help)", line));
            }
            Command::Quit => return false,
        }
        true
    }
}

async fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;

    Ok(UploadFile::new(filename, bytes))
}
