//! Persistence trait and the serialized access point shared by all handlers.

use std::sync::Arc;

use {async_trait::async_trait, tokio::sync::RwLock, tracing::debug};

#[cfg(feature = "metrics")]
use relaygate_metrics::{counter, store as store_metrics};

use crate::{Result, state::BotState};

/// Persistence backend for the bot state. Implementations store the whole
/// state as one document.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<BotState>;
    async fn save(&self, state: &BotState) -> Result<()>;
}

/// Single writer in front of a [`StateStore`].
///
/// Reads are served from the cached state. Mutations take the write lock,
/// apply the closure to a copy, persist the copy and only then publish it,
/// so concurrent events cannot lose each other's updates and a failed save
/// leaves the state as it was.
pub struct ConfigStore {
    backend: Arc<dyn StateStore>,
    state: RwLock<BotState>,
}

impl ConfigStore {
    /// Load the current state from `backend`.
    pub async fn open(backend: Arc<dyn StateStore>) -> Result<Self> {
        let state = backend.load().await?;
        debug!(
            users = state.users.len(),
            links = state.user_channels.len(),
            groups = state.groups.len(),
            joins = state.joins.len(),
            forward = state.forward,
            "state loaded"
        );
        Ok(Self {
            backend,
            state: RwLock::new(state),
        })
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> BotState {
        self.state.read().await.clone()
    }

    /// Run `f` against the current state without copying it.
    pub async fn read<R>(&self, f: impl FnOnce(&BotState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }

    /// Apply `f` atomically and persist the result if anything changed.
    pub async fn update<R>(&self, f: impl FnOnce(&mut BotState) -> R) -> Result<R> {
        let mut current = self.state.write().await;
        let mut next = current.clone();
        let out = f(&mut next);

        if next == *current {
            return Ok(out);
        }

        if let Err(e) = self.backend.save(&next).await {
            #[cfg(feature = "metrics")]
            counter!(store_metrics::WRITE_ERRORS_TOTAL).increment(1);
            return Err(e);
        }

        *current = next;
        #[cfg(feature = "metrics")]
        counter!(store_metrics::WRITES_TOTAL).increment(1);
        Ok(out)
    }
}
