//! Chat entities and wire-protocol DTOs for the remote chat service.
//!
//! DESIGN
//! ======
//! Entities mirror the service's JSON payloads. The live backend uses a few
//! alternate field names (`chat_id` on chat creation, `message_id` and
//! `timestamp` on messages); those are accepted as serde aliases so both
//! shapes decode into the same types.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ENTITIES
// =============================================================================

/// A chat thread as returned by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Server-assigned identifier.
    #[serde(alias = "chat_id")]
    pub id: i64,
    pub title: String,
    /// Preview of the most recent message, if the service provides one.
    #[serde(default)]
    pub last_message: Option<String>,
    pub created_at: String,
}

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Persona prompt rows the backend stores at chat creation.
    System,
}

/// One turn in a chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned identifier. The backend mints these from random
    /// 128-bit values, so they do not fit in `i64`.
    #[serde(alias = "message_id")]
    pub id: u128,
    pub chat_id: i64,
    pub content: String,
    pub role: Role,
    #[serde(alias = "timestamp")]
    pub created_at: String,
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Body of `POST /chat/new`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewChatRequest<'a> {
    pub title: &'a str,
    pub role: &'a str,
    pub model_type: &'a str,
}

/// Body of `POST /chat/{id}/message`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SendMessageRequest<'a> {
    pub content: &'a str,
}

// =============================================================================
// RESPONSE ENVELOPES
// =============================================================================

/// Body of `GET /chats`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatList {
    pub chats: Vec<Chat>,
}

/// Body of `GET /chat/{id}`. Extra chat metadata fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistory {
    pub messages: Vec<Message>,
}
