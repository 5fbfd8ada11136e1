//! In-memory store for testing.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{Error, Result, state::BotState, store::StateStore};

/// In-memory store. No persistence, for tests only. Saves can be made to
/// fail to exercise error paths.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<BotState>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: BotState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn load(&self) -> Result<BotState> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.clone())
    }

    async fn save(&self, state: &BotState) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::message("in-memory store configured to fail"));
        }
        let mut current = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *current = state.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
