//! Remote chat service transport.
//!
//! DESIGN
//! ======
//! `ChatApi` is the seam between the state container and the network: one
//! async method per endpoint of the service contract. `HttpChatApi` is the
//! production implementation; tests substitute scripted mocks.
//!
//! ERROR HANDLING
//! ==============
//! `ApiError` keeps transport, status and decode failures apart so they can
//! be logged usefully. The store collapses all of them into one fixed
//! message per operation.

pub mod config;
pub mod http;

pub use config::ChatApiConfig;
pub use http::HttpChatApi;

use crate::types::{Chat, Message};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by chat service requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),

    /// The request could not be sent or the response body could not be read.
    #[error("API request failed: {0}")]
    Request(String),

    /// The service returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected JSON shape.
    #[error("API response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// TRAIT
// =============================================================================

/// Async access to the remote chat service. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// `GET /chats`
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError>;

    /// `POST /chat/new`
    async fn create_chat(&self, title: &str, role: &str, model_type: &str) -> Result<Chat, ApiError>;

    /// `GET /chat/{chat_id}`
    async fn chat_history(&self, chat_id: i64) -> Result<Vec<Message>, ApiError>;

    /// `POST /chat/{chat_id}/message`
    async fn send_message(&self, chat_id: i64, content: &str) -> Result<Message, ApiError>;

    /// `DELETE /chat/{chat_id}`. The response body is ignored.
    async fn delete_chat(&self, chat_id: i64) -> Result<(), ApiError>;
}
