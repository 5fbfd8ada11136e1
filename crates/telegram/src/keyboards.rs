//! Menu labels, reply keyboards and inline button payloads.
//!
//! Labels exist only here; the rest of the crate works with [`MenuItem`] and
//! [`CallbackAction`].

use {
    relaygate_access::{Decision, PendingAction},
    relaygate_common::{ChatHandle, UserId},
    teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup},
    tracing::warn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    AddGroup,
    RemoveGroup,
    AddMandatoryChannel,
    RemoveMandatoryChannel,
    StartForwarding,
    StopForwarding,
    RegisterChannel,
    ContactOwner,
    Help,
}

const OWNER_ROWS: &[&[MenuItem]] = &[
    &[MenuItem::AddGroup, MenuItem::RemoveGroup],
    &[MenuItem::AddMandatoryChannel, MenuItem::RemoveMandatoryChannel],
    &[MenuItem::StartForwarding, MenuItem::StopForwarding],
];

const USER_ROWS: &[&[MenuItem]] = &[
    &[MenuItem::RegisterChannel],
    &[MenuItem::ContactOwner, MenuItem::Help],
];

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            Self::AddGroup => "➕ Add group",
            Self::RemoveGroup => "➖ Remove group",
            Self::AddMandatoryChannel => "➕ Add mandatory channel",
            Self::RemoveMandatoryChannel => "➖ Remove mandatory channel",
            Self::StartForwarding => "▶️ Start forwarding",
            Self::StopForwarding => "⏹ Stop forwarding",
            Self::RegisterChannel => "➕ Add channel",
            Self::ContactOwner => "📩 Contact owner",
            Self::Help => "ℹ️ Help",
        }
    }

    pub fn owner_only(self) -> bool {
        OWNER_ROWS.iter().any(|row| row.contains(&self))
    }

    /// Resolve `text` to a menu item available to this role. Owner labels
    /// sent by anyone else are not menu selections.
    pub fn parse(text: &str, is_owner: bool) -> Option<Self> {
        let text = text.trim();
        OWNER_ROWS
            .iter()
            .chain(USER_ROWS)
            .flat_map(|row| row.iter().copied())
            .find(|item| item.label() == text)
            .filter(|item| is_owner || !item.owner_only())
    }

    /// The prompt this item opens, if any.
    pub fn pending_action(self) -> Option<PendingAction> {
        match self {
            Self::AddGroup => Some(PendingAction::AddGroup),
            Self::RemoveGroup => Some(PendingAction::RemoveGroup),
            Self::AddMandatoryChannel => Some(PendingAction::AddMandatoryChannel),
            Self::RemoveMandatoryChannel => Some(PendingAction::RemoveMandatoryChannel),
            Self::RegisterChannel => Some(PendingAction::RegisterChannel),
            Self::StartForwarding | Self::StopForwarding | Self::ContactOwner | Self::Help => None,
        }
    }
}

fn reply_keyboard(rows: &[&[MenuItem]]) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = rows
        .iter()
        .map(|row| row.iter().map(|item| KeyboardButton::new(item.label())).collect())
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard()
}

pub fn owner_keyboard() -> KeyboardMarkup {
    reply_keyboard(OWNER_ROWS)
}

pub fn user_keyboard() -> KeyboardMarkup {
    reply_keyboard(USER_ROWS)
}

/// One link button per channel plus "I've joined".
pub fn join_keyboard(channels: &[ChatHandle]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = channels
        .iter()
        .filter_map(|channel| match reqwest::Url::parse(&channel.join_url()) {
            Ok(url) => Some(vec![InlineKeyboardButton::url(channel.to_string(), url)]),
            Err(e) => {
                warn!(%channel, error = %e, "skipping join button");
                None
            },
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        "✅ I've joined",
        CallbackAction::CheckJoin.data(),
    )]);
    InlineKeyboardMarkup::new(rows)
}

pub fn review_keyboard(requester: UserId) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(
            "✅ Approve",
            CallbackAction::Decide {
                subject: requester,
                decision: Decision::Approve,
            }
            .data(),
        ),
        InlineKeyboardButton::callback(
            "❌ Reject",
            CallbackAction::Decide {
                subject: requester,
                decision: Decision::Reject,
            }
            .data(),
        ),
    ]])
}

/// Link to the owner's profile, if the URL is representable.
pub fn contact_keyboard(owner: UserId) -> Option<InlineKeyboardMarkup> {
    let url = reqwest::Url::parse(&format!("tg://user?id={owner}")).ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url("👤 Owner", url),
    ]]))
}

/// Inline button payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// `check_join`
    CheckJoin,
    /// `approve:<id>` / `reject:<id>`
    Decide { subject: UserId, decision: Decision },
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if data == "check_join" {
            return Some(Self::CheckJoin);
        }
        let (verb, id) = data.split_once(':')?;
        let decision = match verb {
            "approve" => Decision::Approve,
            "reject" => Decision::Reject,
            _ => return None,
        };
        let subject = id.parse().ok()?;
        Some(Self::Decide { subject, decision })
    }

    pub fn data(self) -> String {
        match self {
            Self::CheckJoin => "check_join".to_string(),
            Self::Decide { subject, decision } => format!("{}:{subject}", decision.as_str()),
        }
    }
}
