//! In-memory shape of the persisted state file.
//!
//! ```json
//! {
//!   "users": { "42": true, "7": false, "9": null },
//!   "user_channels": { "42": "@src" },
//!   "groups": ["@g1", "@g2"],
//!   "joins": ["@news"],
//!   "forward": true
//! }
//! ```

use std::collections::BTreeMap;

use {
    relaygate_common::{ChatHandle, UserId},
    serde::{Deserialize, Serialize},
};

/// Per-user approval state.
///
/// On disk the `users` map stores `true` (Approved), `false` (Rejected) or
/// `null` (Pending); a user missing from the map is Unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum ApprovalStatus {
    #[default]
    Unknown,
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<bool>> for ApprovalStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Pending,
            Some(true) => Self::Approved,
            Some(false) => Self::Rejected,
        }
    }
}

impl From<ApprovalStatus> for Option<bool> {
    fn from(status: ApprovalStatus) -> Self {
        match status {
            ApprovalStatus::Approved => Some(true),
            ApprovalStatus::Rejected => Some(false),
            ApprovalStatus::Pending | ApprovalStatus::Unknown => None,
        }
    }
}

/// The whole persisted state. Every mutation goes through
/// [`ConfigStore::update`](crate::ConfigStore::update).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotState {
    pub users: BTreeMap<UserId, ApprovalStatus>,
    pub user_channels: BTreeMap<UserId, ChatHandle>,
    pub groups: Vec<ChatHandle>,
    pub joins: Vec<ChatHandle>,
    pub forward: bool,
}

impl BotState {
    pub fn approval(&self, user: UserId) -> ApprovalStatus {
        self.users.get(&user).copied().unwrap_or_default()
    }

    /// Overwrite the status of `user`, returning the previous one.
    pub fn set_approval(&mut self, user: UserId, status: ApprovalStatus) -> ApprovalStatus {
        if status == ApprovalStatus::Unknown {
            return self.users.remove(&user).unwrap_or_default();
        }
        self.users.insert(user, status).unwrap_or_default()
    }

    pub fn channel_of(&self, user: UserId) -> Option<&ChatHandle> {
        self.user_channels.get(&user)
    }

    /// Bind `user` to `channel`, returning the handle it replaces.
    pub fn link_channel(&mut self, user: UserId, channel: ChatHandle) -> Option<ChatHandle> {
        self.user_channels.insert(user, channel)
    }

    /// Users whose linked channel is the public chat `username`.
    pub fn linked_users<'a>(&'a self, username: &'a str) -> impl Iterator<Item = UserId> + 'a {
        self.user_channels
            .iter()
            .filter(move |(_, channel)| channel.matches_username(username))
            .map(|(user, _)| *user)
    }

    pub fn add_group(&mut self, group: ChatHandle) -> bool {
        insert_unique(&mut self.groups, group)
    }

    pub fn remove_group(&mut self, group: &ChatHandle) -> bool {
        remove_handle(&mut self.groups, group)
    }

    pub fn add_join(&mut self, channel: ChatHandle) -> bool {
        insert_unique(&mut self.joins, channel)
    }

    pub fn remove_join(&mut self, channel: &ChatHandle) -> bool {
        remove_handle(&mut self.joins, channel)
    }
}

fn insert_unique(list: &mut Vec<ChatHandle>, handle: ChatHandle) -> bool {
    if list.contains(&handle) {
        return false;
    }
    list.push(handle);
    true
}

fn remove_handle(list: &mut Vec<ChatHandle>, handle: &ChatHandle) -> bool {
    let before = list.len();
    list.retain(|h| h != handle);
    list.len() != before
}
