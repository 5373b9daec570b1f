//! Request DTOs for the HTTP API.

use serde::Deserialize;

use crate::clip::ClipId;

/// File deletion request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    /// Stored name of the file to delete.
    pub stored_name: String,
}

/// Clip creation request.
///
/// `content` is optional at the wire level so a missing field yields the
/// same "No content provided" error as an empty one.
#[derive(Debug, Deserialize)]
pub struct CreateClipRequest {
    /// Clip content.
    #[serde(default)]
    pub content: Option<String>,
    /// Optional label.
    #[serde(default)]
    pub label: Option<String>,
}

/// Clip deletion request.
#[derive(Debug, Deserialize)]
pub struct DeleteClipRequest {
    /// Identifier of the clip to delete.
    pub id: ClipId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_file_request_camel_case() {
        let req: DeleteFileRequest =
            serde_json::from_str(r#"{"storedName":"1700000000000_a.txt"}"#).unwrap();
        assert_eq!(req.stored_name, "1700000000000_a.txt");

        assert!(serde_json::from_str::<DeleteFileRequest>(r#"{"stored_name":"x"}"#).is_err());
    }

    #[test]
    fn test_create_clip_request_optional_fields() {
        let req: CreateClipRequest = serde_json::from_str("{}").unwrap();
        assert!(req.content.is_none());
        assert!(req.label.is_none());

        let req: CreateClipRequest =
            serde_json::from_str(r#"{"content":"hi","label":null}"#).unwrap();
        assert_eq!(req.content.as_deref(), Some("hi"));
        assert!(req.label.is_none());
    }

    #[test]
    fn test_delete_clip_request_ids() {
        let req: DeleteClipRequest = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(req.id, ClipId::Int(7));

        let req: DeleteClipRequest = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(req.id, ClipId::Text("abc".to_string()));
    }
}
