use {
    relaygate_common::{ChatHandle, UserId},
    thiserror::Error,
};

use crate::membership::MemberStatus;

#[derive(Debug, Error)]
pub enum Error {
    /// Submitted text is not a channel/group handle.
    #[error("invalid handle: {0}")]
    InvalidHandle(#[from] relaygate_common::Error),

    /// The service is not an administrator of the channel.
    #[error("not an administrator of {channel} (status: {status})")]
    InsufficientRights {
        channel: ChatHandle,
        status: MemberStatus,
    },

    /// The membership lookup itself failed.
    #[error("membership lookup for {channel} failed: {source}")]
    LookupFailed {
        channel: ChatHandle,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An owner-only action attempted by someone else.
    #[error("user {actor} may not {action}")]
    Unauthorized { actor: UserId, action: &'static str },

    /// The user has not been approved by the owner.
    #[error("user {user} is not approved")]
    NotApproved { user: UserId },

    #[error(transparent)]
    Store(#[from] relaygate_store::Error),
}

impl Error {
    #[must_use]
    pub fn lookup_failed(channel: ChatHandle, source: anyhow::Error) -> Self {
        Self::LookupFailed {
            channel,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn unauthorized(actor: UserId, action: &'static str) -> Self {
        Self::Unauthorized { actor, action }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
