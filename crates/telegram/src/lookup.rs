use {
    async_trait::async_trait,
    relaygate_access::{MemberStatus, MembershipLookup},
    relaygate_common::{ChatHandle, UserId},
    teloxide::{
        Bot,
        requests::Requester as _,
        types::{ChatMemberKind, Recipient, UserId as TgUserId},
    },
};

/// Membership lookups through `getChatMember`.
pub struct TelegramMembership {
    bot: Bot,
}

impl TelegramMembership {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MembershipLookup for TelegramMembership {
    async fn member_status(&self, channel: &ChatHandle, user: UserId) -> anyhow::Result<MemberStatus> {
        let member = self
            .bot
            .get_chat_member(
                Recipient::ChannelUsername(channel.as_str().to_string()),
                TgUserId(user.0),
            )
            .await?;
        Ok(member_status(&member.kind))
    }
}

pub fn member_status(kind: &ChatMemberKind) -> MemberStatus {
    if kind.is_owner() {
        MemberStatus::Creator
    } else if kind.is_administrator() {
        MemberStatus::Administrator
    } else if kind.is_member() {
        MemberStatus::Member
    } else if kind.is_restricted() {
        MemberStatus::Restricted
    } else if kind.is_banned() {
        MemberStatus::Banned
    } else {
        MemberStatus::Left
    }
}
