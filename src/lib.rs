//! # chat-state
//!
//! Client-side state container for a remote chat service. Mirrors the list
//! of chats and the messages of the last loaded chat, and exposes the
//! operations that keep them in sync with the service over HTTP.
//!
//! The presentation layer reads [`ContainerState`] (directly or through
//! [`ChatStore::subscribe`]) and calls the store's operations; it never talks
//! to the service itself.

pub mod api;
pub mod store;
pub mod types;

pub use api::{ApiError, ChatApi, ChatApiConfig, HttpChatApi};
pub use store::{ChatStore, ContainerState, Operation};
pub use types::{Chat, Message, Role};
