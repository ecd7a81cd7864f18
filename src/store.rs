//! Client-side chat state container.
//!
//! DESIGN
//! ======
//! `ChatStore` owns a `ContainerState` and mirrors the remote chat service
//! into it. Each operation performs one request through a [`ChatApi`] and
//! then mutates the state. The state lives inside a `watch` channel so
//! consumers can read it directly or subscribe to change notifications.
//!
//! CONCURRENCY
//! ===========
//! There is no mutual exclusion between operations; callers may run any of
//! them concurrently. Two rules keep the result coherent:
//!
//! - `loading` reflects an in-flight counter of `load_chats` and
//!   `load_messages`, so it stays true until the last outstanding load ends.
//! - `load_chats` and `load_messages` tag requests with a per-operation
//!   sequence number. Only the latest issued request of each kind may apply
//!   its response; older ones are dropped whenever they arrive.
//!
//! Appends (`create_chat`, `send_message`) and removals (`delete_chat`)
//! apply in arrival order.
//!
//! ERROR HANDLING
//! ==============
//! Failures never reach the caller. They are logged and collapsed into the
//! fixed message of the operation, stored in `error`. `error` is only reset
//! by the next failure or by an explicit [`ChatStore::clear_error`].

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::api::{ApiError, ChatApi, ChatApiConfig, HttpChatApi};
use crate::types::{Chat, Message};

// =============================================================================
// STATE
// =============================================================================

/// Published container state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContainerState {
    /// Chats in service-provided order.
    pub chats: Vec<Chat>,
    /// Chat being viewed. Only the collaborator sets this.
    pub current_chat: Option<Chat>,
    /// History of whichever chat was loaded last, plus sent messages.
    pub messages: Vec<Message>,
    /// Chat id `messages` was last loaded for.
    pub messages_chat_id: Option<i64>,
    pub loading: bool,
    /// Last failure message. Never cleared automatically.
    pub error: Option<String>,
}

/// The mutating operations of the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    LoadChats,
    CreateChat,
    LoadMessages,
    SendMessage,
    DeleteChat,
}

impl Operation {
    /// Fixed user-facing message stored in `error` when this operation fails.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::LoadChats => "Failed to load chats",
            Self::CreateChat => "Failed to create chat",
            Self::LoadMessages => "Failed to load messages",
            Self::SendMessage => "Failed to send message",
            Self::DeleteChat => "Failed to delete chat",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LoadChats => "load_chats",
            Self::CreateChat => "create_chat",
            Self::LoadMessages => "load_messages",
            Self::SendMessage => "send_message",
            Self::DeleteChat => "delete_chat",
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

pub struct ChatStore {
    api: Arc<dyn ChatApi>,
    state: watch::Sender<ContainerState>,
    in_flight: AtomicUsize,
    chats_seq: AtomicU64,
    messages_seq: AtomicU64,
}

impl ChatStore {
    /// Create a store with empty state on top of the given transport.
    #[must_use]
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        let (state, _) = watch::channel(ContainerState::default());
        Self {
            api,
            state,
            in_flight: AtomicUsize::new(0),
            chats_seq: AtomicU64::new(0),
            messages_seq: AtomicU64::new(0),
        }
    }

    /// Create a store talking HTTP to the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub fn from_config(config: &ChatApiConfig) -> Result<Self, ApiError> {
        let api = HttpChatApi::new(config)?;
        Ok(Self::new(Arc::new(api)))
    }

    // -------------------------------------------------------------------------
    // Read surface
    // -------------------------------------------------------------------------

    /// Borrow the current state without copying it.
    ///
    /// `f` runs under the state's read lock. Calling any mutating store
    /// method from inside `f` deadlocks.
    pub fn with_state<R>(&self, f: impl FnOnce(&ContainerState) -> R) -> R {
        f(&*self.state.borrow())
    }

    #[must_use]
    pub fn snapshot(&self) -> ContainerState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ContainerState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn chats(&self) -> Vec<Chat> {
        self.with_state(|s| s.chats.clone())
    }

    #[must_use]
    pub fn current_chat(&self) -> Option<Chat> {
        self.with_state(|s| s.current_chat.clone())
    }

    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.with_state(|s| s.messages.clone())
    }

    #[must_use]
    pub fn messages_chat_id(&self) -> Option<i64> {
        self.with_state(|s| s.messages_chat_id)
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.with_state(|s| s.loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.with_state(|s| s.error.clone())
    }

    // -------------------------------------------------------------------------
    // Collaborator-owned fields
    // -------------------------------------------------------------------------

    pub fn set_current_chat(&self, chat: Option<Chat>) {
        self.state.send_modify(|s| s.current_chat = chat);
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Replace `chats` with the service's list.
    pub async fn load_chats(&self) {
        let seq = self.chats_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = self.begin_loading();

        let result = self.api.list_chats().await;
        let op = Operation::LoadChats;
        if let Err(e) = &result {
            error!(op = op.name(), seq, error = %e, "chat service request failed");
        }

        let applied = self.apply_latest(&self.chats_seq, seq, |s| match result {
            Ok(chats) => {
                info!(count = chats.len(), "chats loaded");
                s.chats = chats;
            }
            Err(_) => s.error = Some(op.failure_message().to_string()),
        });
        if !applied {
            debug!(op = op.name(), seq, "discarding stale response");
        }
    }

    /// Create a chat and append it to `chats`. Returns `None` on failure.
    pub async fn create_chat(&self, title: &str, role: &str, model_type: &str) -> Option<Chat> {
        match self.api.create_chat(title, role, model_type).await {
            Ok(chat) => {
                info!(chat_id = chat.id, "chat created");
                self.state.send_modify(|s| s.chats.push(chat.clone()));
                Some(chat)
            }
            Err(e) => {
                self.fail(Operation::CreateChat, &e);
                None
            }
        }
    }

    /// Replace `messages` with the history of `chat_id`.
    pub async fn load_messages(&self, chat_id: i64) {
        let seq = self.messages_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = self.begin_loading();

        let result = self.api.chat_history(chat_id).await;
        let op = Operation::LoadMessages;
        if let Err(e) = &result {
            error!(op = op.name(), seq, chat_id, error = %e, "chat service request failed");
        }

        let applied = self.apply_latest(&self.messages_seq, seq, |s| match result {
            Ok(messages) => {
                info!(chat_id, count = messages.len(), "messages loaded");
                s.messages = messages;
                s.messages_chat_id = Some(chat_id);
            }
            Err(_) => s.error = Some(op.failure_message().to_string()),
        });
        if !applied {
            debug!(op = op.name(), seq, chat_id, "discarding stale response");
        }
    }

    /// Send a user message and append the confirmed message to `messages`.
    /// Nothing is appended before the service confirms it.
    pub async fn send_message(&self, chat_id: i64, content: &str) -> Option<Message> {
        match self.api.send_message(chat_id, content).await {
            Ok(message) => {
                info!(chat_id, message_id = %message.id, "message sent");
                self.state.send_modify(|s| s.messages.push(message.clone()));
                Some(message)
            }
            Err(e) => {
                self.fail(Operation::SendMessage, &e);
                None
            }
        }
    }

    /// Delete a chat and drop it from `chats`. `messages` and
    /// `current_chat` are left alone.
    pub async fn delete_chat(&self, chat_id: i64) {
        match self.api.delete_chat(chat_id).await {
            Ok(()) => {
                info!(chat_id, "chat deleted");
                self.state.send_modify(|s| s.chats.retain(|c| c.id != chat_id));
            }
            Err(e) => self.fail(Operation::DeleteChat, &e),
        }
    }

    // -------------------------------------------------------------------------
    // Bookkeeping
    // -------------------------------------------------------------------------

    fn fail(&self, op: Operation, err: &ApiError) {
        error!(op = op.name(), error = %err, "chat service request failed");
        self.state.send_modify(|s| s.error = Some(op.failure_message().to_string()));
    }

    /// Apply `modify` only if `seq` is still the latest issued on `counter`.
    fn apply_latest(&self, counter: &AtomicU64, seq: u64, modify: impl FnOnce(&mut ContainerState)) -> bool {
        self.state.send_if_modified(|s| {
            if counter.load(Ordering::SeqCst) != seq {
                return false;
            }
            modify(s);
            true
        })
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.state.send_modify(|s| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            s.loading = true;
        });
        LoadingGuard { store: self }
    }
}

/// Decrements the in-flight counter when a load finishes or is dropped.
struct LoadingGuard<'a> {
    store: &'a ChatStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let store = self.store;
        store.state.send_modify(|s| {
            let remaining = store.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            s.loading = remaining > 0;
        });
    }
}
