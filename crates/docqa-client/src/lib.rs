pub mod control;
pub mod documents;
pub mod error;
pub mod http;
pub mod session;
pub mod traits;
pub mod types;
pub mod view;

pub use control::{ActionControl, ControlGuard};
pub use documents::{refresh_documents, UploadController, UploadOutcome, LIST_FAILED, NO_DOCUMENTS, UPLOADING};
pub use error::{ClientError, SessionError};
pub use http::HttpDocumentClient;
pub use session::{SessionController, SessionOutcome, SessionState, StreamSession, ERROR_PREFIX};
pub use traits::{ByteStream, DocumentClient};
pub use types::{DocumentList, DocumentRecord, SearchResponse, UploadFile, UploadResponse};
pub use view::{ConversationView, DocumentListView, ResponseId, ResponseSurface, Role, StatusLine};

pub use docqa_stream::{Formatter, PlainText, RenderSurface};
