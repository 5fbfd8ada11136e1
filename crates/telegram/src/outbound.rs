use {
    async_trait::async_trait,
    relaygate_access::{Decision, Notifier, Requester},
    relaygate_common::{ChatHandle, UserId},
    relaygate_routing::{ChannelPost, PostRelay},
    teloxide::{
        Bot,
        payloads::SendMessageSetters,
        requests::Requester as _,
        types::{ChatId, MessageId, Recipient, ReplyMarkup, UserId as TgUserId},
    },
    tracing::debug,
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{counter, telegram as tg_metrics};

use crate::{Result, keyboards, texts};

/// Private chat with `user`.
pub fn private_chat(user: UserId) -> ChatId {
    ChatId::from(TgUserId(user.0))
}

/// Outbound Bot API calls: plain replies, owner review requests, decision
/// notices and post relays.
#[derive(Clone)]
pub struct TelegramOutbound {
    bot: Bot,
}

impl TelegramOutbound {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<()> {
        let request = self.bot.send_message(chat, text);
        match markup {
            Some(markup) => request.reply_markup(markup).await?,
            None => request.await?,
        };
        #[cfg(feature = "metrics")]
        counter!(tg_metrics::MESSAGES_SENT_TOTAL).increment(1);
        debug!(chat_id = chat.0, "message sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramOutbound {
    async fn review_request(&self, owner: UserId, requester: &Requester) -> anyhow::Result<()> {
        self.send_text(
            private_chat(owner),
            &texts::review_request(requester),
            Some(keyboards::review_keyboard(requester.id).into()),
        )
        .await?;
        Ok(())
    }

    async fn decision(&self, user: UserId, decision: Decision) -> anyhow::Result<()> {
        self.send_text(private_chat(user), texts::decision_notice(decision), None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PostRelay for TelegramOutbound {
    async fn relay(&self, post: &ChannelPost, destination: &ChatHandle) -> anyhow::Result<()> {
        self.bot
            .forward_message(
                Recipient::ChannelUsername(destination.as_str().to_string()),
                ChatId(post.chat_id),
                MessageId(post.message_id),
            )
            .await?;
        Ok(())
    }
}
