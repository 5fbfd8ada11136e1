use std::{sync::Arc, time::Duration};

use {
    relaygate_common::UserId,
    relaygate_config::TelegramConfig,
    relaygate_store::ConfigStore,
    secrecy::ExposeSecret,
    teloxide::{
        ApiError, Bot, RequestError,
        payloads::GetUpdatesSetters,
        requests::{Request, Requester as _},
        types::{AllowedUpdate, BotCommand},
    },
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{counter, telegram as tg_metrics};

use crate::{
    error::{Error, Result},
    handlers,
    state::RelayContext,
};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// A running polling loop.
pub struct PollingHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    username: Option<String>,
}

impl PollingHandle {
    /// The bot's public username, as reported by `getMe`.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop polling and wait for the in-flight update to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "telegram polling task ended abnormally");
        }
    }
}

/// Connect the bot and spawn the long-polling loop.
///
/// Updates are handled one at a time in arrival order.
pub async fn start_polling(config: &TelegramConfig, store: Arc<ConfigStore>) -> Result<PollingHandle> {
    let owner = config
        .owner_id
        .map(UserId)
        .ok_or_else(|| Error::message("telegram.owner_id is not configured"))?;

    // The client timeout must outlast the long-poll timeout or every idle
    // getUpdates call would abort.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let bot = Bot::with_client(config.token.expose_secret(), client);

    let me = bot.get_me().await?;
    let username = me.user.username.clone();

    // Long polling does not work while a webhook is set.
    bot.delete_webhook().send().await?;

    let commands = vec![
        BotCommand::new("start", "Request access or open your panel"),
        BotCommand::new("help", "How this bot works"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("failed to register bot commands: {e}");
    }

    info!(username = ?username, owner = %owner, "telegram bot connected (webhook cleared)");

    let ctx = RelayContext::new(bot.clone(), store, owner, UserId(me.user.id.0));
    let cancel = CancellationToken::new();
    let task = tokio::spawn(poll_loop(
        bot,
        ctx,
        config.poll_timeout_secs,
        cancel.clone(),
    ));

    Ok(PollingHandle {
        cancel,
        task,
        username,
    })
}

async fn poll_loop(bot: Bot, ctx: RelayContext, timeout_secs: u32, cancel: CancellationToken) {
    info!("starting telegram polling loop");
    let mut offset: i32 = 0;

    loop {
        let request = bot
            .get_updates()
            .offset(offset)
            .timeout(timeout_secs)
            .allowed_updates(vec![
                AllowedUpdate::Message,
                AllowedUpdate::CallbackQuery,
                AllowedUpdate::ChannelPost,
            ]);

        let result = tokio::select! {
            () = cancel.cancelled() => break,
            result = request.send() => result,
        };

        match result {
            Ok(updates) => {
                debug!(count = updates.len(), "got telegram updates");
                for update in updates {
                    offset = update.id.as_offset();
                    if let Err(e) = handlers::handle_update(&ctx, update).await {
                        error!(error = %e, "error handling telegram update");
                    }
                }
            },
            Err(RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) => {
                error!("telegram polling stopped: another instance is running with this token");
                cancel.cancel();
                break;
            },
            Err(e) => {
                #[cfg(feature = "metrics")]
                counter!(tg_metrics::POLLING_ERRORS_TOTAL).increment(1);
                warn!(error = %e, "telegram getUpdates failed");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(RETRY_DELAY) => {},
                }
            },
        }
    }

    info!("telegram polling stopped");
}
