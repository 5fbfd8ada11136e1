//! Access control for the relay bot.
//!
//! A user reaches the bot through the [`membership`] gate (every mandatory
//! channel joined), then the [`approval`] workflow (owner decides). Approved
//! users and the owner drive configuration through one-shot [`session`]
//! prompts, applied by the [`console`] (owner sets and toggle) and the
//! [`links`] registry (user → source channel). [`service::AccessService`]
//! ties these together for a transport adapter.

pub mod approval;
pub mod console;
pub mod error;
pub mod links;
pub mod membership;
pub mod notify;
pub mod service;
pub mod session;

pub use {
    approval::{AccessOutcome, ApprovalWorkflow, Decision, Requester},
    console::OwnerConsole,
    error::{Error, Result},
    links::ChannelLinkRegistry,
    membership::{
        GateOutcome, MemberStatus, MembershipGate, MembershipLookup, MissingChannel, MissingReason,
    },
    notify::Notifier,
    service::{AccessService, Applied, InputOutcome},
    session::{ModalSessions, PendingAction},
};
