//! Owner-only configuration: destination groups, mandatory channels and the
//! forwarding toggle.

use std::sync::Arc;

use {
    relaygate_common::{ChatHandle, UserId},
    relaygate_store::ConfigStore,
    tracing::{info, warn},
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{approval as approval_metrics, counter};

use crate::{
    error::{Error, Result},
    membership::MembershipGate,
};

pub struct OwnerConsole {
    store: Arc<ConfigStore>,
    gate: Arc<MembershipGate>,
    owner: UserId,
}

impl OwnerConsole {
    pub fn new(store: Arc<ConfigStore>, gate: Arc<MembershipGate>, owner: UserId) -> Self {
        Self { store, gate, owner }
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        user == self.owner
    }

    fn authorize(&self, actor: UserId, action: &'static str) -> Result<()> {
        if self.is_owner(actor) {
            return Ok(());
        }
        warn!(actor = %actor, action, "owner-only action refused");
        #[cfg(feature = "metrics")]
        counter!(approval_metrics::UNAUTHORIZED_TOTAL).increment(1);
        Err(Error::unauthorized(actor, action))
    }

    /// Returns `false` if the group was already configured.
    pub async fn add_group(&self, actor: UserId, group: ChatHandle) -> Result<bool> {
        self.authorize(actor, "add groups")?;
        self.gate.verify_service_admin(&group).await?;
        let added = self.store.update(|s| s.add_group(group.clone())).await?;
        info!(%group, added, "destination group added");
        Ok(added)
    }

    /// Returns `false` if the group was not configured.
    pub async fn remove_group(&self, actor: UserId, group: &ChatHandle) -> Result<bool> {
        self.authorize(actor, "remove groups")?;
        let removed = self.store.update(|s| s.remove_group(group)).await?;
        info!(%group, removed, "destination group removed");
        Ok(removed)
    }

    pub async fn add_mandatory_channel(&self, actor: UserId, channel: ChatHandle) -> Result<bool> {
        self.authorize(actor, "add mandatory channels")?;
        self.gate.verify_service_admin(&channel).await?;
        let added = self.store.update(|s| s.add_join(channel.clone())).await?;
        info!(%channel, added, "mandatory channel added");
        Ok(added)
    }

    pub async fn remove_mandatory_channel(&self, actor: UserId, channel: &ChatHandle) -> Result<bool> {
        self.authorize(actor, "remove mandatory channels")?;
        let removed = self.store.update(|s| s.remove_join(channel)).await?;
        info!(%channel, removed, "mandatory channel removed");
        Ok(removed)
    }

    /// Set the global forwarding toggle, returning the previous value.
    pub async fn set_forwarding(&self, actor: UserId, enabled: bool) -> Result<bool> {
        self.authorize(actor, "toggle forwarding")?;
        let previous = self
            .store
            .update(|s| std::mem::replace(&mut s.forward, enabled))
            .await?;
        info!(enabled, previous, "forwarding toggled");
        Ok(previous)
    }

    pub async fn forwarding(&self) -> bool {
        self.store.read(|s| s.forward).await
    }
}
