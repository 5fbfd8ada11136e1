//! One-shot per-user prompts: which action the user's next text completes.

use std::{collections::HashMap, sync::Mutex};

use relaygate_common::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingAction {
    AddGroup,
    RemoveGroup,
    AddMandatoryChannel,
    RemoveMandatoryChannel,
    RegisterChannel,
}

impl PendingAction {
    pub fn owner_only(self) -> bool {
        !matches!(self, Self::RegisterChannel)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddGroup => "add_group",
            Self::RemoveGroup => "remove_group",
            Self::AddMandatoryChannel => "add_mandatory_channel",
            Self::RemoveMandatoryChannel => "remove_mandatory_channel",
            Self::RegisterChannel => "register_channel",
        }
    }
}

/// At most one [`PendingAction`] per user. Not persisted.
#[derive(Default)]
pub struct ModalSessions {
    slots: Mutex<HashMap<UserId, PendingAction>>,
}

impl ModalSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or replace) the user's slot.
    pub fn begin(&self, user: UserId, action: PendingAction) -> Option<PendingAction> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user, action)
    }

    /// Consume the user's slot.
    pub fn take(&self, user: UserId) -> Option<PendingAction> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&user)
    }

    pub fn peek(&self, user: UserId) -> Option<PendingAction> {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user)
            .copied()
    }

    pub fn cancel(&self, user: UserId) -> bool {
        self.take(user).is_some()
    }
}
