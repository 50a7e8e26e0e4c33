use std::sync::Arc;
use tracing::{info, warn};

use crate::control::ActionControl;
use crate::error::ClientError;
use crate::traits::DocumentClient;
use crate::types::{UploadFile, UploadResponse};
use crate::view::{DocumentListView, StatusLine};

pub const NO_DOCUMENTS: &str = "No documents uploaded yet.";
pub const LIST_FAILED: &str = "Failed to load the document list.";
pub const UPLOADING: &str = "Uploading...";

/// Reload the document list into `view`.
///
/// An empty list shows a single placeholder instead of an empty pane; a
/// failed request shows an error placeholder. Returns the number of
/// documents shown.
pub async fn refresh_documents<L>(client: &dyn DocumentClient, view: &mut L) -> usize
where
    L: DocumentListView + ?Sized,
{
    let list = match client.list_documents().await {
        Ok(list) => list,
        Err(e) => {
            warn!("Document list request failed: {}", e);
            view.clear();
            view.show_placeholder(LIST_FAILED);
            return 0;
        }
    };

    if let Some(error) = &list.error {
        warn!("Server reported a document list error: {}", error);
    }

    view.clear();
    if list.documents.is_empty() {
        view.show_placeholder(NO_DOCUMENTS);
        return 0;
    }

    for record in &list.documents {
        view.push_document(record);
    }
    list.documents.len()
}

#[derive(Debug)]
pub enum UploadOutcome {
    /// Another upload holds the control
    Rejected,
    Uploaded(UploadResponse),
    Failed(ClientError),
}

/// Upload workflow: status text, control locking and list refresh
pub struct UploadController {
    client: Arc<dyn DocumentClient>,
}

impl UploadController {
    pub fn new(client: Arc<dyn DocumentClient>) -> Self {
        Self { client }
    }

    /// Upload `file`, reporting progress on the view's status line and
    /// refreshing its document list on success
    pub async fn upload<V>(&self, file: UploadFile, view: &mut V, control: &ActionControl) -> UploadOutcome
    where
        V: StatusLine + DocumentListView + ?Sized,
    {
        let Some(guard) = control.try_acquire() else {
            warn!("Rejecting upload while another upload is running");
            return UploadOutcome::Rejected;
        };

        view.set_status(UPLOADING);
        let filename = file.filename.clone();

        let result = self.client.upload(file).await;
        drop(guard);

        match result {
            Ok(response) => {
                info!(
                    "Uploaded {} (document {:?}, {:?} chunks)",
                    filename, response.document_id, response.chunks_count
                );
                view.set_status(&response.message);
                refresh_documents(self.client.as_ref(), view).await;
                UploadOutcome::Uploaded(response)
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", filename, e);
                view.set_status(&format!("Upload failed: {}", e));
                UploadOutcome::Failed(e)
            }
        }
    }
}
