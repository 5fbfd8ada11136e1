//! Per-user approval state machine: Unknown → Pending → Approved/Rejected.

use std::sync::Arc;

use {
    relaygate_common::UserId,
    relaygate_store::{ApprovalStatus, ConfigStore},
    tracing::{info, warn},
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{approval as approval_metrics, counter, labels};

use crate::{
    error::{Error, Result},
    membership::{GateOutcome, MembershipGate, MissingChannel},
    notify::Notifier,
};

/// Who is asking for access, as shown to the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: UserId,
    pub full_name: String,
    /// Public username without the leading `@`, if the user has one.
    pub username: Option<String>,
}

impl Requester {
    pub fn new(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            username: None,
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn status(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Result of [`ApprovalWorkflow::request_access`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Mandatory channels not joined. Nothing was recorded.
    MembershipRequired(Vec<MissingChannel>),
    /// The user is Pending; `owner_notified` is false if the review
    /// request could not be delivered.
    Requested { owner_notified: bool },
    Approved { is_owner: bool },
    Rejected,
}

pub struct ApprovalWorkflow {
    store: Arc<ConfigStore>,
    gate: Arc<MembershipGate>,
    notifier: Arc<dyn Notifier>,
    owner: UserId,
}

impl ApprovalWorkflow {
    pub fn new(
        store: Arc<ConfigStore>,
        gate: Arc<MembershipGate>,
        notifier: Arc<dyn Notifier>,
        owner: UserId,
    ) -> Self {
        Self {
            store,
            gate,
            notifier,
            owner,
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub async fn status(&self, user: UserId) -> ApprovalStatus {
        if user == self.owner {
            return ApprovalStatus::Approved;
        }
        self.store.read(|s| s.approval(user)).await
    }

    /// Entry point for `/start` and "confirm membership".
    ///
    /// The membership gate runs first; while it is unsatisfied the stored
    /// status is never touched. Unknown and Pending users become Pending and
    /// the owner gets a (fresh) review request.
    pub async fn request_access(&self, requester: &Requester) -> Result<AccessOutcome> {
        let user = requester.id;
        if user == self.owner {
            return Ok(record(AccessOutcome::Approved { is_owner: true }));
        }

        let mandatory = self.store.read(|s| s.joins.clone()).await;
        if let GateOutcome::Unsatisfied(missing) =
            self.gate.check_membership(user, &mandatory).await
        {
            return Ok(record(AccessOutcome::MembershipRequired(missing)));
        }

        let previous = self
            .store
            .update(|s| match s.approval(user) {
                ApprovalStatus::Unknown | ApprovalStatus::Pending => {
                    s.set_approval(user, ApprovalStatus::Pending)
                },
                settled => settled,
            })
            .await?;

        let outcome = match previous {
            ApprovalStatus::Approved => AccessOutcome::Approved { is_owner: false },
            ApprovalStatus::Rejected => AccessOutcome::Rejected,
            ApprovalStatus::Unknown | ApprovalStatus::Pending => {
                info!(user_id = %user, previous = %previous, "access requested");
                let owner_notified = match self.notifier.review_request(self.owner, requester).await
                {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(user_id = %user, error = %e, "failed to send review request to owner");
                        false
                    },
                };
                AccessOutcome::Requested { owner_notified }
            },
        };
        Ok(record(outcome))
    }

    /// Owner decision. Overwrites any earlier decision for `subject`, then
    /// tells the subject. A delivery failure does not undo the decision.
    pub async fn decide(
        &self,
        actor: UserId,
        subject: UserId,
        decision: Decision,
    ) -> Result<ApprovalStatus> {
        if actor != self.owner {
            #[cfg(feature = "metrics")]
            counter!(approval_metrics::UNAUTHORIZED_TOTAL).increment(1);
            warn!(actor = %actor, subject = %subject, "decision from non-owner ignored");
            return Err(Error::unauthorized(actor, "decide approvals"));
        }

        let previous = self
            .store
            .update(|s| s.set_approval(subject, decision.status()))
            .await?;
        info!(subject = %subject, previous = %previous, decision = decision.as_str(), "access decided");
        #[cfg(feature = "metrics")]
        counter!(approval_metrics::DECISIONS_TOTAL, labels::DECISION => decision.as_str())
            .increment(1);

        if let Err(e) = self.notifier.decision(subject, decision).await {
            warn!(subject = %subject, error = %e, "failed to notify user of decision");
        }
        Ok(previous)
    }
}

fn record(outcome: AccessOutcome) -> AccessOutcome {
    #[cfg(feature = "metrics")]
    {
        let label = match &outcome {
            AccessOutcome::MembershipRequired(_) => "membership_required",
            AccessOutcome::Requested { .. } => "requested",
            AccessOutcome::Approved { .. } => "approved",
            AccessOutcome::Rejected => "rejected",
        };
        counter!(approval_metrics::ACCESS_REQUESTS_TOTAL, labels::OUTCOME => label).increment(1);
    }
    outcome
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            membership::{MemberStatus, MembershipLookup, fake::FakeLookup},
            notify::fake::{FakeNotifier, Sent},
        },
        relaygate_common::ChatHandle,
        relaygate_store::{BotState, InMemoryStore, StateStore},
    };

    const OWNER: UserId = UserId(1000);
    const SERVICE: UserId = UserId(1);
    const USER: UserId = UserId(42);

    struct Harness {
        backend: Arc<InMemoryStore>,
        lookup: Arc<FakeLookup>,
        notifier: Arc<FakeNotifier>,
        workflow: ApprovalWorkflow,
    }

    async fn harness(state: BotState) -> Harness {
        let backend = Arc::new(InMemoryStore::with_state(state));
        let store = Arc::new(
            ConfigStore::open(Arc::clone(&backend) as Arc<dyn StateStore>)
                .await
                .unwrap(),
        );
        let lookup = Arc::new(FakeLookup::default());
        let notifier = Arc::new(FakeNotifier::default());
        let gate = Arc::new(MembershipGate::new(
            Arc::clone(&lookup) as Arc<dyn MembershipLookup>,
            SERVICE,
        ));
        let workflow = ApprovalWorkflow::new(
            store,
            gate,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            OWNER,
        );
        Harness {
            backend,
            lookup,
            notifier,
            workflow,
        }
    }

    fn news_only() -> BotState {
        BotState {
            joins: vec![ChatHandle::parse("@news").unwrap()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unsatisfied_gate_leaves_users_untouched() {
        let h = harness(news_only()).await;

        let outcome = h
            .workflow
            .request_access(&Requester::new(USER, "Ann"))
            .await
            .unwrap();

        let AccessOutcome::MembershipRequired(missing) = outcome else {
            panic!("expected membership prompt, got {outcome:?}");
        };
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].channel.as_str(), "@news");
        assert_eq!(h.workflow.status(USER).await, ApprovalStatus::Unknown);
        assert_eq!(h.backend.save_count(), 0);
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn join_then_request_then_approve() {
        let h = harness(news_only()).await;
        let ann = Requester::new(USER, "Ann").with_username("ann");

        h.lookup.set("@news", USER, MemberStatus::Member);
        let outcome = h.workflow.request_access(&ann).await.unwrap();
        assert_eq!(outcome, AccessOutcome::Requested {
            owner_notified: true
        });
        assert_eq!(h.workflow.status(USER).await, ApprovalStatus::Pending);
        assert_eq!(h.notifier.sent(), vec![Sent::Review {
            owner: OWNER,
            requester: USER
        }]);

        h.workflow
            .decide(OWNER, USER, Decision::Approve)
            .await
            .unwrap();
        assert_eq!(h.workflow.status(USER).await, ApprovalStatus::Approved);
        let on_disk = h.backend.load().await.unwrap();
        assert_eq!(on_disk.approval(USER), ApprovalStatus::Approved);
        assert_eq!(h.notifier.sent().last(), Some(&Sent::Decision {
            user: USER,
            decision: Decision::Approve
        }));

        let again = h.workflow.request_access(&ann).await.unwrap();
        assert_eq!(again, AccessOutcome::Approved { is_owner: false });
    }

    #[tokio::test]
    async fn pending_request_resends_review() {
        let h = harness(BotState::default()).await;
        let ann = Requester::new(USER, "Ann");

        h.workflow.request_access(&ann).await.unwrap();
        h.workflow.request_access(&ann).await.unwrap();

        assert_eq!(h.notifier.sent().len(), 2);
        assert_eq!(h.workflow.status(USER).await, ApprovalStatus::Pending);
    }

    #[tokio::test]
    async fn rejected_user_is_not_re_queued() {
        let h = harness(BotState::default()).await;
        h.workflow
            .decide(OWNER, USER, Decision::Reject)
            .await
            .unwrap();

        let outcome = h
            .workflow
            .request_access(&Requester::new(USER, "Ann"))
            .await
            .unwrap();

        assert_eq!(outcome, AccessOutcome::Rejected);
        assert_eq!(h.workflow.status(USER).await, ApprovalStatus::Rejected);
        assert!(
            !h.notifier
                .sent()
                .iter()
                .any(|s| matches!(s, Sent::Review { .. }))
        );
    }

    #[tokio::test]
    async fn last_decision_wins() {
        let h = harness(BotState::default()).await;
        h.workflow
            .decide(OWNER, USER, Decision::Approve)
            .await
            .unwrap();
        let previous = h
            .workflow
            .decide(OWNER, USER, Decision::Reject)
            .await
            .unwrap();
        assert_eq!(previous, ApprovalStatus::Approved);
        assert_eq!(h.workflow.status(USER).await, ApprovalStatus::Rejected);
    }

    #[tokio::test]
    async fn non_owner_cannot_decide() {
        let h = harness(BotState::default()).await;
        let err = h
            .workflow
            .decide(USER, UserId(7), Decision::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized { actor, .. } if actor == USER));
        assert_eq!(h.workflow.status(UserId(7)).await, ApprovalStatus::Unknown);
        assert!(h.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn owner_bypasses_gate() {
        let h = harness(news_only()).await;
        let outcome = h
            .workflow
            .request_access(&Requester::new(OWNER, "Boss"))
            .await
            .unwrap();
        assert_eq!(outcome, AccessOutcome::Approved { is_owner: true });
        assert_eq!(h.lookup.calls(), 0);
        assert_eq!(h.backend.save_count(), 0);
    }

    #[tokio::test]
    async fn notification_failure_keeps_pending() {
        let h = harness(BotState::default()).await;
        h.notifier.set_fail(true);
        let outcome = h
            .workflow
            .request_access(&Requester::new(USER, "Ann"))
            .await
            .unwrap();
        assert_eq!(outcome, AccessOutcome::Requested {
            owner_notified: false
        });
        assert_eq!(h.workflow.status(USER).await, ApprovalStatus::Pending);
    }
}
