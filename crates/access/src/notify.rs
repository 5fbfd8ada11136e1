//! Outbound notifications emitted by the approval workflow.

use {async_trait::async_trait, relaygate_common::UserId};

use crate::approval::{Decision, Requester};

/// Delivers approval traffic to the owner and to requesting users.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Ask `owner` to approve or reject `requester`.
    async fn review_request(&self, owner: UserId, requester: &Requester) -> anyhow::Result<()>;

    /// Tell `user` the owner's decision.
    async fn decision(&self, user: UserId, decision: Decision) -> anyhow::Result<()>;
}
