use serde::{Deserialize, Serialize};

// -- Messages --

/// A message as it appears on the wire. Every successful read or write
/// (other than delete) returns the full row in this shape. Timestamps keep
/// SQLite's `YYYY-MM-DD HH:MM:SS.ffffff` UTC text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub body: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Both fields are optional at the serde level so that a missing field
/// produces the board's own validation error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    pub body: Option<String>,
    pub username: Option<String>,
}

impl CreateMessageRequest {
    /// Returns `(body, username)` when both are present and non-empty.
    pub fn into_required(self) -> Option<(String, String)> {
        match (self.body, self.username) {
            (Some(body), Some(username)) if !body.is_empty() && !username.is_empty() => {
                Some((body, username))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMessageRequest {
    pub body: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteMessageResponse {
    pub message: String,
}
