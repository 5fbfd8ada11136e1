//! User-facing message text.

use relaygate_access::{Applied, Decision, Error as AccessError, PendingAction, Requester};

pub const JOIN_REQUIRED: &str = "🔒 Join these channels first, then press \"I've joined\":";
pub const VERIFY_FAILED: &str =
    "⚠️ Could not verify your membership right now. Join the channels below and try again:";
pub const REQUEST_SENT: &str = "⏳ Your request has been sent to the owner.";
pub const REQUEST_UNDELIVERED: &str =
    "⏳ Your request is recorded, but the owner could not be reached yet. Try /start again later.";
pub const REJECTED: &str = "❌ Your request was rejected.";
pub const OWNER_PANEL: &str = "👑 Owner panel";
pub const USER_PANEL: &str = "👤 User panel";
pub const APPROVED_NOTICE: &str = "✅ You have been approved. Send /start to open your panel.";
pub const REJECTED_NOTICE: &str = "❌ Your access request was rejected.";
pub const FORWARD_ON: &str = "▶️ Forwarding enabled.";
pub const FORWARD_OFF: &str = "⏹ Forwarding stopped.";
pub const NOT_ALLOWED: &str = "⛔ You are not allowed to do that.";
pub const NOT_APPROVED: &str = "⛔ Your access has not been approved yet. Send /start first.";
pub const CONTACT_OWNER: &str = "📩 You can reach the owner here:";
pub const HELP: &str = "ℹ️ How it works:\n\
    1. Send /start and join the required channels.\n\
    2. Wait for the owner to approve you.\n\
    3. Press \"Add channel\", make this bot an administrator of your channel and send its @username.\n\
    New posts in your channel are then forwarded to the owner's groups while forwarding is on.";
pub const UNEXPECTED_ERROR: &str = "⚠️ Something went wrong, please try again.";

pub fn prompt(action: PendingAction) -> &'static str {
    match action {
        PendingAction::AddGroup | PendingAction::RemoveGroup => {
            "Send the group's @username."
        },
        PendingAction::AddMandatoryChannel | PendingAction::RemoveMandatoryChannel => {
            "Send the channel's @username."
        },
        PendingAction::RegisterChannel => {
            "Send your channel's @username (this bot must be an administrator there)."
        },
    }
}

/// Review request shown to the owner.
pub fn review_request(requester: &Requester) -> String {
    let username = requester
        .username
        .as_deref()
        .map_or_else(|| "(no username)".to_string(), |u| format!("@{u}"));
    format!(
        "📥 New access request\n👤 {}\n🔗 {username}\n🆔 {}",
        requester.full_name, requester.id
    )
}

pub fn decision_notice(decision: Decision) -> &'static str {
    match decision {
        Decision::Approve => APPROVED_NOTICE,
        Decision::Reject => REJECTED_NOTICE,
    }
}

/// Toast shown to the owner after pressing a review button.
pub fn decision_ack(decision: Decision) -> &'static str {
    match decision {
        Decision::Approve => "Approved",
        Decision::Reject => "Rejected",
    }
}

pub fn applied(action: PendingAction, applied: &Applied) -> String {
    let kind = match action {
        PendingAction::AddGroup | PendingAction::RemoveGroup => "Group",
        _ => "Channel",
    };
    match applied {
        Applied::Added(handle) => format!("✅ {kind} {handle} added."),
        Applied::AlreadyPresent(handle) => format!("ℹ️ {kind} {handle} is already in the list."),
        Applied::Removed(handle) => format!("🗑 {kind} {handle} removed."),
        Applied::NotFound(handle) => format!("ℹ️ {kind} {handle} was not in the list."),
        Applied::Linked { channel, previous } => match previous {
            Some(old) if old != channel => format!("✅ Channel {channel} registered (replaces {old})."),
            _ => format!("✅ Channel {channel} registered."),
        },
    }
}

pub fn access_error(error: &AccessError) -> String {
    match error {
        AccessError::InvalidHandle(_) => {
            "❌ That is not a valid @username. Pick the menu item again to retry.".to_string()
        },
        AccessError::InsufficientRights { channel, .. } => {
            format!("❌ This bot is not an administrator of {channel}.")
        },
        AccessError::LookupFailed { channel, .. } => {
            format!("❌ Could not find {channel}. Check the @username and the bot's rights.")
        },
        AccessError::Unauthorized { .. } => NOT_ALLOWED.to_string(),
        AccessError::NotApproved { .. } => NOT_APPROVED.to_string(),
        AccessError::Store(_) => UNEXPECTED_ERROR.to_string(),
    }
}
