use std::sync::Arc;

use {
    relaygate_common::{ChatHandle, UserId},
    relaygate_store::ConfigStore,
    tracing::info,
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{console as console_metrics, counter};

use crate::{error::Result, membership::MembershipGate};

/// User → source channel bindings. A link is only written after the service
/// has been confirmed as administrator of the channel; it is not re-checked
/// later.
pub struct ChannelLinkRegistry {
    store: Arc<ConfigStore>,
    gate: Arc<MembershipGate>,
}

impl ChannelLinkRegistry {
    pub fn new(store: Arc<ConfigStore>, gate: Arc<MembershipGate>) -> Self {
        Self { store, gate }
    }

    /// Link `user` to `channel`, replacing any previous link. Returns the
    /// replaced handle.
    pub async fn register_link(&self, user: UserId, channel: ChatHandle) -> Result<Option<ChatHandle>> {
        self.gate.verify_service_admin(&channel).await?;

        let linked = channel.clone();
        let previous = self
            .store
            .update(move |s| s.link_channel(user, linked))
            .await?;
        info!(user_id = %user, %channel, previous = ?previous.as_ref().map(ChatHandle::as_str), "channel linked");
        #[cfg(feature = "metrics")]
        counter!(console_metrics::LINKS_REGISTERED_TOTAL).increment(1);
        Ok(previous)
    }

    pub async fn link_of(&self, user: UserId) -> Option<ChatHandle> {
        self.store.read(|s| s.channel_of(user).cloned()).await
    }
}
