use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Response of `POST /search`; only logged by the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Response of `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_count: Option<usize>,
}

/// Metadata of an uploaded document, as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub filename: String,
    /// `None` when the server sent a missing or unreadable timestamp
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    /// Creation time in the local timezone, or "unknown"
    pub fn display_time(&self) -> String {
        match self.created_at {
            Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "unknown".to_string(),
        }
    }
}

/// Response of `GET /documents`
///
/// The server answers storage failures with an empty list plus `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A file to send to `POST /upload`
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match &raw {
        Some(serde_json::Value::String(text)) => parse_timestamp(text),
        _ => None,
    };

    if parsed.is_none() {
        if let Some(value) = raw.filter(|v| !v.is_null()) {
            warn!("Unreadable document timestamp: {}", value);
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_naive_timestamp_is_utc() {
        let ts = parse_timestamp("2024-05-01T12:30:00.123456").unwrap();
        assert_eq!(ts.timestamp(), Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap().timestamp());
    }

    #[test]
    fn test_offset_timestamp() {
        let ts = parse_timestamp("2024-05-01T21:30:00+09:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_document_list_parsing() {
        let json = r#"{"documents":[{"id":3,"filename":"report.pdf","created_at":"2024-05-01T12:30:00"}]}"#;
        let list: DocumentList = serde_json::from_str(json).unwrap();

        assert_eq!(list.documents.len(), 1);
        assert_eq!(list.documents[0].filename, "report.pdf");
        assert_eq!(list.documents[0].id, Some(3));
        assert!(list.error.is_none());
    }

    #[test]
    fn test_document_list_with_server_error() {
        let json = r#"{"documents":[],"error":"database unavailable"}"#;
        let list: DocumentList = serde_json::from_str(json).unwrap();

        assert!(list.documents.is_empty());
        assert_eq!(list.error.as_deref(), Some("database unavailable"));
    }

    #[test]
    fn test_bad_timestamp_keeps_record() {
        let json = r#"{"documents":[
            {"filename":"a.txt","created_at":"yesterday"},
            {"filename":"b.txt","created_at":"2024-05-01T12:30:00"},
            {"filename":"c.txt"}
        ]}"#;
        let list: DocumentList = serde_json::from_str(json).unwrap();

        assert_eq!(list.documents.len(), 3);
        assert_eq!(list.documents[0].created_at, None);
        assert_eq!(list.documents[0].display_time(), "unknown");
        assert!(list.documents[1].created_at.is_some());
        assert_eq!(list.documents[2].created_at, None);
    }
}
