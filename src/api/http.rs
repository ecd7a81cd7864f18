//! `reqwest`-backed implementation of [`ChatApi`].

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{ApiError, ChatApi, ChatApiConfig};
use crate::types::{Chat, ChatList, Message, MessageHistory, NewChatRequest, SendMessageRequest};

// =============================================================================
// ENDPOINTS
// =============================================================================

pub(crate) fn chats_endpoint() -> &'static str {
    "/chats"
}

pub(crate) fn new_chat_endpoint() -> &'static str {
    "/chat/new"
}

pub(crate) fn chat_endpoint(chat_id: i64) -> String {
    format!("/chat/{chat_id}")
}

pub(crate) fn chat_message_endpoint(chat_id: i64) -> String {
    format!("/chat/{chat_id}/message")
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpChatApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatApi {
    /// Build a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: &ChatApiConfig) -> Result<Self, ApiError> {
        let base_url = super::config::normalize_base_url(&config.base_url)?;
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request and return the body text of a 2xx response.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl ChatApi for HttpChatApi {
    async fn list_chats(&self) -> Result<Vec<Chat>, ApiError> {
        let text = self
            .execute(self.http.get(self.url(chats_endpoint())))
            .await?;
        let list: ChatList = decode(&text)?;
        Ok(list.chats)
    }

    async fn create_chat(&self, title: &str, role: &str, model_type: &str) -> Result<Chat, ApiError> {
        let body = NewChatRequest { title, role, model_type };
        let text = self
            .execute(self.http.post(self.url(new_chat_endpoint())).json(&body))
            .await?;
        decode(&text)
    }

    async fn chat_history(&self, chat_id: i64) -> Result<Vec<Message>, ApiError> {
        let text = self
            .execute(self.http.get(self.url(&chat_endpoint(chat_id))))
            .await?;
        let history: MessageHistory = decode(&text)?;
        Ok(history.messages)
    }

    async fn send_message(&self, chat_id: i64, content: &str) -> Result<Message, ApiError> {
        let body = SendMessageRequest { content };
        let text = self
            .execute(
                self.http
                    .post(self.url(&chat_message_endpoint(chat_id)))
                    .json(&body),
            )
            .await?;
        decode(&text)
    }

    async fn delete_chat(&self, chat_id: i64) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&chat_endpoint(chat_id))))
            .await?;
        Ok(())
    }
}
