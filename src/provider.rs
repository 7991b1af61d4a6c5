//! The injected wallet abstracted as a capability.
//!
//! [`WalletProvider`] mirrors the EIP-1193 surface this crate needs: one
//! `request` method and `chainChanged` subscription management. Browser
//! bindings implement it against the injected object; tests and demos use
//! [`SimulatedWallet`](crate::simulated::SimulatedWallet).

use crate::eip::{codes, RequestArguments};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Callback invoked with the new hex chain id.
pub type ChainChangedHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by a subscription, used to remove it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync + 'static {
    /// Sends an EIP-1193 request and waits for the wallet's answer.
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError>;

    /// Registers a `chainChanged` handler.
    fn on_chain_changed(&self, handler: ChainChangedHandler) -> ListenerId;

    /// Removes a handler; returns whether it was still registered.
    fn remove_chain_changed_listener(&self, id: ListenerId) -> bool;
}

/// A rejected provider request (EIP-1193 `ProviderRpcError`).
///
/// Displays as the wallet's message, unmodified.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(codes::USER_REJECTED_REQUEST, "User rejected the request.")
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == codes::USER_REJECTED_REQUEST
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == codes::UNRECOGNIZED_CHAIN
    }
}

/// Handler bookkeeping for providers that emit `chainChanged` themselves.
#[derive(Default)]
pub struct ChainChangedListeners {
    next_id: AtomicU64,
    handlers: Mutex<BTreeMap<ListenerId, ChainChangedHandler>>,
}

impl ChainChangedListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handler: ChainChangedHandler) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().insert(id, handler);
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        self.handlers.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls every registered handler in subscription order.
    ///
    /// Handlers run outside the lock so they may (un)subscribe. A handler
    /// removed while the emit is in progress is skipped.
    pub fn emit(&self, chain_id: &str) {
        let snapshot: Vec<(ListenerId, ChainChangedHandler)> = self
            .handlers
            .lock()
            .iter()
            .map(|(id, handler)| (*id, handler.clone()))
            .collect();
        for (id, handler) in snapshot {
            if !self.handlers.lock().contains_key(&id) {
                continue;
            }
            handler(chain_id);
        }
    }
}

impl fmt::Debug for ChainChangedListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainChangedListeners")
            .field("len", &self.len())
            .finish()
    }
}

/// Keeps a `chainChanged` handler registered until dropped.
#[must_use = "the handler is removed as soon as the subscription is dropped"]
pub struct ChainSubscription {
    provider: Arc<dyn WalletProvider>,
    id: ListenerId,
}

impl ChainSubscription {
    pub fn new(provider: Arc<dyn WalletProvider>, handler: ChainChangedHandler) -> Self {
        let id = provider.on_chain_changed(handler);
        Self { provider, id }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ChainSubscription {
    fn drop(&mut self) {
        if !self.provider.remove_chain_changed_listener(self.id) {
            tracing::debug!(id = ?self.id, "chainChanged listener was already removed");
        }
    }
}

impl fmt::Debug for ChainSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainSubscription")
            .field("id", &self.id)
            .finish()
    }
}
