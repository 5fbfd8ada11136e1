//! Channel membership checks.
//!
//! Every lookup result other than member/administrator/creator, including a
//! failed lookup, counts as "not joined" (fail-closed).

use std::{fmt, sync::Arc};

use {
    async_trait::async_trait,
    futures::future::join_all,
    relaygate_common::{ChatHandle, UserId},
    tracing::{debug, warn},
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{counter, gate as gate_metrics, labels};

use crate::error::{Error, Result};

/// Status of a user in a channel, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberStatus {
    /// Joined, in any role.
    pub fn is_member(self) -> bool {
        matches!(self, Self::Creator | Self::Administrator | Self::Member)
    }

    /// Holds administrative rights.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Creator | Self::Administrator)
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Creator => "creator",
            Self::Administrator => "administrator",
            Self::Member => "member",
            Self::Restricted => "restricted",
            Self::Left => "left",
            Self::Banned => "banned",
        };
        f.write_str(s)
    }
}

/// Looks up a user's status in a channel.
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    async fn member_status(&self, channel: &ChatHandle, user: UserId) -> anyhow::Result<MemberStatus>;
}

/// Why a mandatory channel is not satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    NotMember(MemberStatus),
    LookupFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingChannel {
    pub channel: ChatHandle,
    pub reason: MissingReason,
}

impl MissingChannel {
    pub fn lookup_failed(&self) -> bool {
        matches!(self.reason, MissingReason::LookupFailed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Satisfied,
    /// Missing channels, in mandatory-set order.
    Unsatisfied(Vec<MissingChannel>),
}

impl GateOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }

    pub fn missing(&self) -> &[MissingChannel] {
        match self {
            Self::Satisfied => &[],
            Self::Unsatisfied(missing) => missing,
        }
    }
}

/// Membership checks against a [`MembershipLookup`], for end users and for
/// the service's own administrator rights.
pub struct MembershipGate {
    lookup: Arc<dyn MembershipLookup>,
    service_id: UserId,
}

impl MembershipGate {
    /// `service_id` is the relay service's own user id.
    pub fn new(lookup: Arc<dyn MembershipLookup>, service_id: UserId) -> Self {
        Self { lookup, service_id }
    }

    pub fn service_id(&self) -> UserId {
        self.service_id
    }

    /// Check `user` against every mandatory channel. All lookups run
    /// concurrently so the caller gets the complete missing list.
    pub async fn check_membership(&self, user: UserId, mandatory: &[ChatHandle]) -> GateOutcome {
        if mandatory.is_empty() {
            return GateOutcome::Satisfied;
        }

        let lookups = mandatory
            .iter()
            .map(|channel| self.lookup.member_status(channel, user));
        let results = join_all(lookups).await;

        let missing: Vec<MissingChannel> = mandatory
            .iter()
            .zip(results)
            .filter_map(|(channel, result)| match result {
                Ok(status) if status.is_member() => None,
                Ok(status) => Some(MissingChannel {
                    channel: channel.clone(),
                    reason: MissingReason::NotMember(status),
                }),
                Err(e) => {
                    warn!(user_id = %user, %channel, error = %e, "membership lookup failed");
                    #[cfg(feature = "metrics")]
                    counter!(gate_metrics::LOOKUP_FAILURES_TOTAL).increment(1);
                    Some(MissingChannel {
                        channel: channel.clone(),
                        reason: MissingReason::LookupFailed(e.to_string()),
                    })
                },
            })
            .collect();

        debug!(user_id = %user, missing = missing.len(), "membership checked");

        if missing.is_empty() {
            #[cfg(feature = "metrics")]
            counter!(gate_metrics::CHECKS_TOTAL, labels::RESULT => "satisfied").increment(1);
            GateOutcome::Satisfied
        } else {
            #[cfg(feature = "metrics")]
            counter!(gate_metrics::CHECKS_TOTAL, labels::RESULT => "unsatisfied").increment(1);
            GateOutcome::Unsatisfied(missing)
        }
    }

    /// Succeeds only if the service is administrator or creator of `channel`.
    pub async fn verify_service_admin(&self, channel: &ChatHandle) -> Result<()> {
        match self.lookup.member_status(channel, self.service_id).await {
            Ok(status) if status.is_admin() => {
                #[cfg(feature = "metrics")]
                counter!(gate_metrics::ADMIN_CHECKS_TOTAL, labels::RESULT => "granted")
                    .increment(1);
                Ok(())
            },
            Ok(status) => {
                #[cfg(feature = "metrics")]
                counter!(gate_metrics::ADMIN_CHECKS_TOTAL, labels::RESULT => "denied")
                    .increment(1);
                Err(Error::InsufficientRights {
                    channel: channel.clone(),
                    status,
                })
            },
            Err(e) => {
                #[cfg(feature = "metrics")]
                counter!(gate_metrics::ADMIN_CHECKS_TOTAL, labels::RESULT => "failed")
                    .increment(1);
                Err(Error::lookup_failed(channel.clone(), e))
            },
        }
    }
}


#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, fake::FakeLookup, rstest::rstest};

    const SERVICE: UserId = UserId(1);
    const USER: UserId = UserId(42);

    fn handles(list: &[&str]) -> Vec<ChatHandle> {
        list.iter().map(|h| ChatHandle::parse(h).unwrap()).collect()
    }

    fn gate(lookup: &Arc<FakeLookup>) -> MembershipGate {
        MembershipGate::new(Arc::clone(lookup) as Arc<dyn MembershipLookup>, SERVICE)
    }

    #[tokio::test]
    async fn empty_mandatory_set_is_satisfied_without_lookups() {
        let lookup = Arc::new(FakeLookup::default());
        let outcome = gate(&lookup).check_membership(USER, &[]).await;
        assert!(outcome.is_satisfied());
        assert_eq!(lookup.calls(), 0);
    }

    #[rstest]
    #[case(MemberStatus::Member, true)]
    #[case(MemberStatus::Administrator, true)]
    #[case(MemberStatus::Creator, true)]
    #[case(MemberStatus::Restricted, false)]
    #[case(MemberStatus::Left, false)]
    #[case(MemberStatus::Banned, false)]
    #[tokio::test]
    async fn statuses_that_count_as_joined(#[case] status: MemberStatus, #[case] joined: bool) {
        let lookup = Arc::new(FakeLookup::default());
        lookup.set("@news", USER, status);
        let outcome = gate(&lookup)
            .check_membership(USER, &handles(&["@news"]))
            .await;
        assert_eq!(outcome.is_satisfied(), joined);
    }

    #[tokio::test]
    async fn reports_every_missing_channel_in_order() {
        let lookup = Arc::new(FakeLookup::default());
        lookup.set("@b", USER, MemberStatus::Member);
        lookup.fail("@c");
        let outcome = gate(&lookup)
            .check_membership(USER, &handles(&["@a", "@b", "@c"]))
            .await;

        let missing = outcome.missing();
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].channel.as_str(), "@a");
        assert_eq!(
            missing[0].reason,
            MissingReason::NotMember(MemberStatus::Left)
        );
        assert_eq!(missing[1].channel.as_str(), "@c");
        assert!(missing[1].lookup_failed());
    }

    #[tokio::test]
    async fn admin_check_requires_admin_or_creator() {
        let lookup = Arc::new(FakeLookup::default());
        lookup.set("@admin", SERVICE, MemberStatus::Administrator);
        lookup.set("@owned", SERVICE, MemberStatus::Creator);
        lookup.set("@plain", SERVICE, MemberStatus::Member);
        lookup.fail("@gone");
        let gate = gate(&lookup);

        assert!(gate.verify_service_admin(&handles(&["@admin"])[0]).await.is_ok());
        assert!(gate.verify_service_admin(&handles(&["@owned"])[0]).await.is_ok());
        assert!(matches!(
            gate.verify_service_admin(&handles(&["@plain"])[0]).await,
            Err(Error::InsufficientRights {
                status: MemberStatus::Member,
                ..
            })
        ));
        assert!(matches!(
            gate.verify_service_admin(&handles(&["@gone"])[0]).await,
            Err(Error::LookupFailed { .. })
        ));
    }
}
