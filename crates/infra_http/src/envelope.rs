//! Response envelope shared by the write collaborators
//!
//! ```json
//! { "success": true,  "data": { "id": "SO-1042" } }
//! { "success": false, "error": "Customer is on credit hold" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::HttpError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload
    ///
    /// A `success: false` answer becomes `HttpError::Rejected` with the
    /// collaborator's error string unchanged.
    pub fn into_result(self, collaborator: &'static str) -> Result<T, HttpError> {
        if !self.success {
            return Err(HttpError::Rejected {
                message: self
                    .error
                    .unwrap_or_else(|| format!("{} rejected the request", collaborator)),
            });
        }
        self.data.ok_or(HttpError::MissingData { collaborator })
    }
}

/// Payload of a successful create call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: RecordId,
}

/// Record identifiers arrive as strings or numbers depending on the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Text(text) => text,
            RecordId::Number(number) => number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_data() {
        let envelope: ApiEnvelope<CreatedRecord> =
            serde_json::from_str(r#"{"success": true, "data": {"id": "SO-1042"}}"#).unwrap();
        let record = envelope.into_result("sales-order").unwrap();
        assert_eq!(String::from(record.id), "SO-1042");
    }

    #[test]
    fn test_numeric_id() {
        let envelope: ApiEnvelope<CreatedRecord> =
            serde_json::from_str(r#"{"success": true, "data": {"id": 77}}"#).unwrap();
        let record = envelope.into_result("warranty-claim").unwrap();
        assert_eq!(String::from(record.id), "77");
    }

    #[test]
    fn test_failure_keeps_message() {
        let envelope: ApiEnvelope<CreatedRecord> =
            serde_json::from_str(r#"{"success": false, "error": "Card expired"}"#).unwrap();
        match envelope.into_result("warranty-claim") {
            Err(HttpError::Rejected { message }) => assert_eq!(message, "Card expired"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_success_without_data() {
        let envelope: ApiEnvelope<CreatedRecord> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            envelope.into_result("sales-order"),
            Err(HttpError::MissingData { .. })
        ));
    }
}
