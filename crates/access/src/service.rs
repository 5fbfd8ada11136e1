//! Facade used by transport adapters.

use std::sync::Arc;

use {
    relaygate_common::{ChatHandle, UserId},
    relaygate_store::{ApprovalStatus, ConfigStore},
    tracing::{debug, info},
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{console as console_metrics, counter, labels};

use crate::{
    approval::{AccessOutcome, ApprovalWorkflow, Decision, Requester},
    console::OwnerConsole,
    error::{Error, Result},
    links::ChannelLinkRegistry,
    membership::{MembershipGate, MembershipLookup},
    notify::Notifier,
    session::{ModalSessions, PendingAction},
};

/// What a completed prompt changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Added(ChatHandle),
    AlreadyPresent(ChatHandle),
    Removed(ChatHandle),
    NotFound(ChatHandle),
    Linked {
        channel: ChatHandle,
        previous: Option<ChatHandle>,
    },
}

/// A consumed prompt and its result. The slot is already cleared.
#[derive(Debug)]
pub struct InputOutcome {
    pub action: PendingAction,
    pub result: Result<Applied>,
}

pub struct AccessService {
    store: Arc<ConfigStore>,
    workflow: ApprovalWorkflow,
    links: ChannelLinkRegistry,
    console: OwnerConsole,
    sessions: ModalSessions,
    owner: UserId,
}

impl AccessService {
    pub fn new(
        store: Arc<ConfigStore>,
        lookup: Arc<dyn MembershipLookup>,
        notifier: Arc<dyn Notifier>,
        owner: UserId,
        service_id: UserId,
    ) -> Self {
        let gate = Arc::new(MembershipGate::new(lookup, service_id));
        Self {
            workflow: ApprovalWorkflow::new(
                Arc::clone(&store),
                Arc::clone(&gate),
                notifier,
                owner,
            ),
            links: ChannelLinkRegistry::new(Arc::clone(&store), Arc::clone(&gate)),
            console: OwnerConsole::new(Arc::clone(&store), gate, owner),
            sessions: ModalSessions::new(),
            store,
            owner,
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        user == self.owner
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn links(&self) -> &ChannelLinkRegistry {
        &self.links
    }

    pub fn sessions(&self) -> &ModalSessions {
        &self.sessions
    }

    pub async fn status(&self, user: UserId) -> ApprovalStatus {
        self.workflow.status(user).await
    }

    pub async fn request_access(&self, requester: &Requester) -> Result<AccessOutcome> {
        self.workflow.request_access(requester).await
    }

    pub async fn decide(
        &self,
        actor: UserId,
        subject: UserId,
        decision: Decision,
    ) -> Result<ApprovalStatus> {
        self.workflow.decide(actor, subject, decision).await
    }

    pub async fn set_forwarding(&self, actor: UserId, enabled: bool) -> Result<bool> {
        self.console.set_forwarding(actor, enabled).await
    }

    async fn authorize(&self, actor: UserId, action: PendingAction) -> Result<()> {
        if self.is_owner(actor) {
            return Ok(());
        }
        if action.owner_only() {
            return Err(Error::unauthorized(actor, action.as_str()));
        }
        match self.status(actor).await {
            ApprovalStatus::Approved => Ok(()),
            _ => Err(Error::NotApproved { user: actor }),
        }
    }

    /// Open a prompt for `action`. A refused selection leaves any existing
    /// prompt untouched.
    pub async fn select_action(&self, actor: UserId, action: PendingAction) -> Result<()> {
        self.authorize(actor, action).await?;
        let replaced = self.sessions.begin(actor, action);
        debug!(user_id = %actor, action = action.as_str(), replaced = ?replaced, "prompt opened");
        #[cfg(feature = "metrics")]
        counter!(console_metrics::ACTIONS_SELECTED_TOTAL, labels::ACTION => action.as_str())
            .increment(1);
        Ok(())
    }

    /// Complete the user's open prompt with `text`. Returns `None` when no
    /// prompt is open. The prompt is consumed whatever the outcome.
    pub async fn submit_input(&self, actor: UserId, text: &str) -> Option<InputOutcome> {
        let action = self.sessions.take(actor)?;
        let result = self.apply(actor, action, text).await;

        match &result {
            Ok(applied) => info!(user_id = %actor, action = action.as_str(), ?applied, "prompt completed"),
            Err(e) => info!(user_id = %actor, action = action.as_str(), error = %e, "prompt failed"),
        }
        #[cfg(feature = "metrics")]
        counter!(
            console_metrics::INPUTS_TOTAL,
            labels::ACTION => action.as_str(),
            labels::RESULT => if result.is_ok() { "ok" } else { "error" }
        )
        .increment(1);

        Some(InputOutcome { action, result })
    }

    async fn apply(&self, actor: UserId, action: PendingAction, text: &str) -> Result<Applied> {
        let handle = ChatHandle::parse(text)?;
        self.authorize(actor, action).await?;

        let applied = match action {
            PendingAction::AddGroup => {
                added(self.console.add_group(actor, handle.clone()).await?, handle)
            },
            PendingAction::RemoveGroup => {
                removed(self.console.remove_group(actor, &handle).await?, handle)
            },
            PendingAction::AddMandatoryChannel => added(
                self.console
                    .add_mandatory_channel(actor, handle.clone())
                    .await?,
                handle,
            ),
            PendingAction::RemoveMandatoryChannel => removed(
                self.console
                    .remove_mandatory_channel(actor, &handle)
                    .await?,
                handle,
            ),
            PendingAction::RegisterChannel => {
                let previous = self.links.register_link(actor, handle.clone()).await?;
                Applied::Linked {
                    channel: handle,
                    previous,
                }
            },
        };
        Ok(applied)
    }
}

fn added(changed: bool, handle: ChatHandle) -> Applied {
    if changed {
        Applied::Added(handle)
    } else {
        Applied::AlreadyPresent(handle)
    }
}

fn removed(changed: bool, handle: ChatHandle) -> Applied {
    if changed {
        Applied::Removed(handle)
    } else {
        Applied::NotFound(handle)
    }
}
