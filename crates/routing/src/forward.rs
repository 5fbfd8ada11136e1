//! Forward router.
//!
//! A post is relayed only when forwarding is on and some user has linked the
//! posting channel. Approval status is never consulted. Each destination is
//! attempted once, concurrently; a failure is recorded and the others carry
//! on.

use std::sync::Arc;

use {
    async_trait::async_trait,
    futures::future::join_all,
    relaygate_common::{ChatHandle, UserId},
    relaygate_store::ConfigStore,
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use {
    relaygate_metrics::{counter, histogram, labels, relay as relay_metrics},
    std::time::Instant,
};

/// A post published in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPost {
    pub chat_id: i64,
    pub message_id: i32,
    /// Public username of the channel, without `@`. `None` for private
    /// channels.
    pub username: Option<String>,
}

/// Delivers one post to one destination, preserving attribution.
#[async_trait]
pub trait PostRelay: Send + Sync {
    async fn relay(&self, post: &ChannelPost, destination: &ChatHandle) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayFailure {
    pub destination: ChatHandle,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub origin: String,
    /// Users whose link matched the origin.
    pub linked_users: Vec<UserId>,
    pub delivered: Vec<ChatHandle>,
    pub failed: Vec<RelayFailure>,
}

impl RelayReport {
    pub fn attempts(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Forwarding is switched off.
    Disabled,
    /// The channel has no public username.
    Anonymous,
    /// Nobody linked this channel.
    Unlinked { origin: String },
    Relayed(RelayReport),
}

impl RouteDecision {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Anonymous => "anonymous",
            Self::Unlinked { .. } => "unlinked",
            Self::Relayed(_) => "relayed",
        }
    }
}

pub struct ForwardRouter {
    store: Arc<ConfigStore>,
    relay: Arc<dyn PostRelay>,
}

impl ForwardRouter {
    pub fn new(store: Arc<ConfigStore>, relay: Arc<dyn PostRelay>) -> Self {
        Self { store, relay }
    }

    pub async fn route(&self, post: &ChannelPost) -> RouteDecision {
        let decision = self.route_inner(post).await;
        debug!(chat_id = post.chat_id, message_id = post.message_id, decision = decision.as_str(), "channel post routed");
        #[cfg(feature = "metrics")]
        counter!(relay_metrics::POSTS_TOTAL, labels::DECISION => decision.as_str()).increment(1);
        decision
    }

    async fn route_inner(&self, post: &ChannelPost) -> RouteDecision {
        let Some(origin) = post.username.as_deref().filter(|u| !u.is_empty()) else {
            return if self.store.read(|s| s.forward).await {
                RouteDecision::Anonymous
            } else {
                RouteDecision::Disabled
            };
        };

        // One consistent view of toggle, links and destinations.
        let (forward, linked_users, destinations) = self
            .store
            .read(|s| {
                (
                    s.forward,
                    s.linked_users(origin).collect::<Vec<_>>(),
                    s.groups.clone(),
                )
            })
            .await;

        if !forward {
            return RouteDecision::Disabled;
        }
        if linked_users.is_empty() {
            return RouteDecision::Unlinked {
                origin: origin.to_string(),
            };
        }

        #[cfg(feature = "metrics")]
        let started = Instant::now();

        let attempts = destinations.iter().map(|destination| async move {
            (destination, self.relay.relay(post, destination).await)
        });
        let mut report = RelayReport {
            origin: origin.to_string(),
            linked_users,
            ..Default::default()
        };
        for (destination, result) in join_all(attempts).await {
            #[cfg(feature = "metrics")]
            counter!(relay_metrics::ATTEMPTS_TOTAL).increment(1);
            match result {
                Ok(()) => report.delivered.push(destination.clone()),
                Err(e) => {
                    warn!(origin, %destination, error = %e, "relay failed");
                    #[cfg(feature = "metrics")]
                    counter!(relay_metrics::FAILURES_TOTAL).increment(1);
                    report.failed.push(RelayFailure {
                        destination: destination.clone(),
                        error: e.to_string(),
                    });
                },
            }
        }

        #[cfg(feature = "metrics")]
        histogram!(relay_metrics::DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        info!(
            origin,
            message_id = post.message_id,
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "channel post relayed"
        );
        RouteDecision::Relayed(report)
    }
}
