//! Update handlers: private messages, button presses and channel posts.

use {
    relaygate_access::{AccessOutcome, Error as AccessError, InputOutcome, MissingChannel, Requester},
    relaygate_common::{ChatHandle, UserId},
    relaygate_routing::{ChannelPost, RouteDecision},
    teloxide::{
        payloads::AnswerCallbackQuerySetters,
        requests::Requester as _,
        types::{CallbackQuery, ChatId, Message, ReplyMarkup, Update, UpdateKind, User},
    },
    tracing::{debug, warn},
};

#[cfg(feature = "metrics")]
use relaygate_metrics::{counter, histogram, labels, telegram as tg_metrics};

use crate::{
    keyboards::{self, CallbackAction, MenuItem},
    outbound::private_chat,
    state::RelayContext,
    texts,
};

/// Route one update to its handler.
pub async fn handle_update(ctx: &RelayContext, update: Update) -> anyhow::Result<()> {
    #[cfg(feature = "metrics")]
    let start = std::time::Instant::now();

    let (kind, result) = match update.kind {
        UpdateKind::Message(msg) => ("message", handle_message(ctx, &msg).await),
        UpdateKind::CallbackQuery(query) => {
            ("callback_query", handle_callback_query(ctx, &query).await)
        },
        UpdateKind::ChannelPost(msg) => ("channel_post", handle_channel_post(ctx, &msg).await),
        other => {
            debug!("ignoring update: {other:?}");
            ("other", Ok(()))
        },
    };

    #[cfg(feature = "metrics")]
    {
        counter!(tg_metrics::UPDATES_RECEIVED_TOTAL, labels::KIND => kind).increment(1);
        histogram!(tg_metrics::HANDLER_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
    }
    #[cfg(not(feature = "metrics"))]
    let _ = kind;

    result
}

fn requester_of(user: &User) -> Requester {
    Requester {
        id: UserId(user.id.0),
        full_name: user.full_name(),
        username: user.username.clone(),
    }
}

/// Bot command name without the leading `/` or a `@botname` suffix.
fn command(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('/')?;
    let word = rest.split_whitespace().next()?;
    word.split('@').next()
}

async fn reply(
    ctx: &RelayContext,
    chat: ChatId,
    text: &str,
    markup: Option<ReplyMarkup>,
) -> anyhow::Result<()> {
    ctx.outbound.send_text(chat, text, markup).await?;
    Ok(())
}

/// Private text messages: commands, menu selections and prompt answers.
pub async fn handle_message(ctx: &RelayContext, msg: &Message) -> anyhow::Result<()> {
    if !msg.chat.is_private() {
        debug!(chat_id = msg.chat.id.0, "ignoring non-private message");
        return Ok(());
    }
    let (Some(from), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };
    let user = UserId(from.id.0);
    let chat = msg.chat.id;
    let text = text.trim();

    match command(text) {
        Some("start") => return start(ctx, chat, &requester_of(from)).await,
        Some("help") => return reply(ctx, chat, texts::HELP, None).await,
        Some(other) => {
            debug!(user_id = %user, command = other, "unknown command");
            return Ok(());
        },
        None => {},
    }

    if let Some(item) = MenuItem::parse(text, ctx.service.is_owner(user)) {
        return menu(ctx, chat, user, item).await;
    }

    match ctx.service.submit_input(user, text).await {
        Some(InputOutcome { action, result }) => {
            let text = match &result {
                Ok(applied) => texts::applied(action, applied),
                Err(e) => texts::access_error(e),
            };
            reply(ctx, chat, &text, None).await
        },
        None => {
            debug!(user_id = %user, "text outside a prompt ignored");
            Ok(())
        },
    }
}

async fn menu(ctx: &RelayContext, chat: ChatId, user: UserId, item: MenuItem) -> anyhow::Result<()> {
    if let Some(action) = item.pending_action() {
        let text = match ctx.service.select_action(user, action).await {
            Ok(()) => texts::prompt(action).to_string(),
            Err(e) => texts::access_error(&e),
        };
        return reply(ctx, chat, &text, None).await;
    }

    // Any other menu press counts as the one message a prompt waits for.
    if ctx.service.sessions().cancel(user) {
        debug!(user_id = %user, item = ?item, "open prompt dropped by menu selection");
    }

    match item {
        MenuItem::StartForwarding | MenuItem::StopForwarding => {
            let enabled = item == MenuItem::StartForwarding;
            let text = match ctx.service.set_forwarding(user, enabled).await {
                Ok(_) if enabled => texts::FORWARD_ON.to_string(),
                Ok(_) => texts::FORWARD_OFF.to_string(),
                Err(e) => texts::access_error(&e),
            };
            reply(ctx, chat, &text, None).await
        },
        MenuItem::ContactOwner => {
            let markup = keyboards::contact_keyboard(ctx.owner()).map(ReplyMarkup::from);
            reply(ctx, chat, texts::CONTACT_OWNER, markup).await
        },
        MenuItem::Help => reply(ctx, chat, texts::HELP, None).await,
        MenuItem::AddGroup
        | MenuItem::RemoveGroup
        | MenuItem::AddMandatoryChannel
        | MenuItem::RemoveMandatoryChannel
        | MenuItem::RegisterChannel => Ok(()),
    }
}

/// `/start` and "I've joined": run the access request and show the result.
async fn start(ctx: &RelayContext, chat: ChatId, requester: &Requester) -> anyhow::Result<()> {
    let outcome = match ctx.service.request_access(requester).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(user_id = %requester.id, error = %e, "access request failed");
            return reply(ctx, chat, &texts::access_error(&e), None).await;
        },
    };

    match outcome {
        AccessOutcome::MembershipRequired(missing) => {
            let text = if missing.iter().any(MissingChannel::lookup_failed) {
                texts::VERIFY_FAILED
            } else {
                texts::JOIN_REQUIRED
            };
            let channels: Vec<ChatHandle> = missing.into_iter().map(|m| m.channel).collect();
            let markup = keyboards::join_keyboard(&channels);
            reply(ctx, chat, text, Some(markup.into())).await
        },
        AccessOutcome::Requested { owner_notified } => {
            let text = if owner_notified {
                texts::REQUEST_SENT
            } else {
                texts::REQUEST_UNDELIVERED
            };
            reply(ctx, chat, text, None).await
        },
        AccessOutcome::Approved { is_owner: true } => {
            let markup = keyboards::owner_keyboard();
            reply(ctx, chat, texts::OWNER_PANEL, Some(markup.into())).await
        },
        AccessOutcome::Approved { is_owner: false } => {
            let markup = keyboards::user_keyboard();
            reply(ctx, chat, texts::USER_PANEL, Some(markup.into())).await
        },
        AccessOutcome::Rejected => reply(ctx, chat, texts::REJECTED, None).await,
    }
}

async fn answer(ctx: &RelayContext, query: &CallbackQuery, text: Option<&str>) {
    let request = ctx.bot.answer_callback_query(&query.id);
    let result = match text {
        Some(text) => request.text(text).await,
        None => request.await,
    };
    if let Err(e) = result {
        warn!(error = %e, "failed to answer callback query");
    }
}

/// Inline button presses: membership confirmation and owner decisions.
pub async fn handle_callback_query(ctx: &RelayContext, query: &CallbackQuery) -> anyhow::Result<()> {
    let actor = UserId(query.from.id.0);
    let Some(action) = query.data.as_deref().and_then(CallbackAction::parse) else {
        debug!(user_id = %actor, data = ?query.data, "unknown callback payload");
        answer(ctx, query, None).await;
        return Ok(());
    };

    match action {
        CallbackAction::CheckJoin => {
            answer(ctx, query, None).await;
            let chat = query
                .message
                .as_ref()
                .map_or_else(|| private_chat(actor), |m| m.chat().id);
            start(ctx, chat, &requester_of(&query.from)).await
        },
        CallbackAction::Decide { subject, decision } => {
            match ctx.service.decide(actor, subject, decision).await {
                Ok(_) => {
                    answer(ctx, query, Some(texts::decision_ack(decision))).await;
                    if let Some(message) = &query.message
                        && let Err(e) = ctx
                            .bot
                            .edit_message_reply_markup(message.chat().id, message.id())
                            .await
                    {
                        warn!(error = %e, "failed to clear review buttons");
                    }
                },
                Err(AccessError::Unauthorized { .. }) => answer(ctx, query, None).await,
                Err(e) => answer(ctx, query, Some(&texts::access_error(&e))).await,
            }
            Ok(())
        },
    }
}

/// Channel posts go to the forward router.
pub async fn handle_channel_post(ctx: &RelayContext, msg: &Message) -> anyhow::Result<()> {
    let post = ChannelPost {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        username: msg.chat.username().map(str::to_string),
    };
    match ctx.router.route(&post).await {
        RouteDecision::Relayed(report) if !report.failed.is_empty() => {
            warn!(
                origin = %report.origin,
                delivered = report.delivered.len(),
                failed = report.failed.len(),
                "channel post partially relayed"
            );
        },
        decision => debug!(chat_id = post.chat_id, ?decision, "channel post handled"),
    }
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        net::SocketAddr,
        sync::{Arc, Mutex},
    };

    use {
        async_trait::async_trait,
        axum::{Json, Router, body::Bytes, extract::State, http::Uri, routing::post},
        relaygate_access::{MemberStatus, MembershipLookup, PendingAction},
        relaygate_store::{ApprovalStatus, BotState, ConfigStore, InMemoryStore, StateStore},
        serde_json::{Value, json},
        teloxide::Bot,
        tokio::sync::oneshot,
    };

    use super::*;

    const OWNER: u64 = 1000;
    const SERVICE: u64 = 1;
    const USER: u64 = 42;

    #[derive(Debug, Clone)]
    struct Captured {
        method: String,
        body: Value,
    }

    #[derive(Clone, Default)]
    struct MockTelegramApi {
        requests: Arc<Mutex<Vec<Captured>>>,
        /// `chat_id`s whose ForwardMessage calls fail.
        failing: Arc<Vec<String>>,
    }

    fn message_result(chat_id: &Value) -> Value {
        json!({
            "message_id": 1,
            "date": 0,
            "chat": { "id": chat_id.as_i64().unwrap_or(1), "type": "private", "first_name": "x" },
            "text": "ok"
        })
    }

    async fn telegram_api_handler(
        State(state): State<MockTelegramApi>,
        uri: Uri,
        body: Bytes,
    ) -> Json<Value> {
        let method = uri.path().rsplit('/').next().unwrap_or_default().to_string();
        let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        state.requests.lock().expect("lock requests").push(Captured {
            method: method.clone(),
            body: body.clone(),
        });

        let chat_id = &body["chat_id"];
        if method == "ForwardMessage"
            && state
                .failing
                .iter()
                .any(|f| chat_id.as_str() == Some(f.as_str()))
        {
            return Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            }));
        }

        let result = match method.as_str() {
            "SendMessage" | "ForwardMessage" | "EditMessageReplyMarkup" => message_result(chat_id),
            _ => json!(true),
        };
        Json(json!({ "ok": true, "result": result }))
    }

    struct MockServer {
        api: MockTelegramApi,
        addr: SocketAddr,
        shutdown: Option<oneshot::Sender<()>>,
    }

    impl MockServer {
        async fn start(failing: &[&str]) -> Self {
            let api = MockTelegramApi {
                failing: Arc::new(failing.iter().map(|s| s.to_string()).collect()),
                ..Default::default()
            };
            let app = Router::new()
                .route("/{*path}", post(telegram_api_handler))
                .with_state(api.clone());
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind test listener");
            let addr = listener.local_addr().expect("local addr");
            let (tx, rx) = oneshot::channel::<()>();
            tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = rx.await;
                    })
                    .await
                    .expect("serve mock telegram api");
            });
            Self {
                api,
                addr,
                shutdown: Some(tx),
            }
        }

        fn bot(&self) -> Bot {
            let url = reqwest::Url::parse(&format!("http://{}/", self.addr)).expect("api url");
            Bot::new("test-token").set_api_url(url)
        }

        fn calls(&self, method: &str) -> Vec<Value> {
            self.api
                .requests
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.method == method)
                .map(|c| c.body.clone())
                .collect()
        }
    }

    impl Drop for MockServer {
        fn drop(&mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
        }
    }

    #[derive(Default)]
    struct StaticLookup {
        statuses: HashMap<(String, u64), MemberStatus>,
        failing: Vec<String>,
    }

    impl StaticLookup {
        fn with(mut self, channel: &str, user: u64, status: MemberStatus) -> Self {
            self.statuses.insert((channel.to_string(), user), status);
            self
        }

        fn failing(mut self, channel: &str) -> Self {
            self.failing.push(channel.to_string());
            self
        }
    }

    #[async_trait]
    impl MembershipLookup for StaticLookup {
        async fn member_status(
            &self,
            channel: &ChatHandle,
            user: UserId,
        ) -> anyhow::Result<MemberStatus> {
            if self.failing.iter().any(|c| *c == channel.to_string()) {
                anyhow::bail!("Bad Request: chat not found");
            }
            Ok(self
                .statuses
                .get(&(channel.to_string(), user.0))
                .copied()
                .unwrap_or(MemberStatus::Left))
        }
    }

    async fn context(server: &MockServer, state: BotState, lookup: StaticLookup) -> RelayContext {
        let backend = Arc::new(InMemoryStore::with_state(state));
        let store = Arc::new(
            ConfigStore::open(backend as Arc<dyn StateStore>)
                .await
                .unwrap(),
        );
        RelayContext::with_lookup(
            server.bot(),
            store,
            Arc::new(lookup),
            UserId(OWNER),
            UserId(SERVICE),
        )
    }

    fn user_json(id: u64, name: &str) -> Value {
        json!({ "id": id, "is_bot": false, "first_name": name, "username": name.to_lowercase() })
    }

    fn private_text(from: u64, text: &str) -> Update {
        serde_json::from_str(&json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "date": 1,
                "chat": { "id": from, "type": "private", "first_name": "Ann" },
                "from": user_json(from, "Ann"),
                "text": text
            }
        }).to_string())
        .expect("deserialize private message")
    }

    fn callback(from: u64, data: &str) -> Update {
        serde_json::from_str(&json!({
            "update_id": 2,
            "callback_query": {
                "id": "cb-1",
                "from": user_json(from, "Boss"),
                "chat_instance": "ci",
                "data": data,
                "message": {
                    "message_id": 99,
                    "date": 1,
                    "chat": { "id": from, "type": "private", "first_name": "Boss" },
                    "text": "review"
                }
            }
        }).to_string())
        .expect("deserialize callback query")
    }

    fn channel_post(username: &str) -> Update {
        serde_json::from_str(&json!({
            "update_id": 3,
            "channel_post": {
                "message_id": 5,
                "date": 1,
                "chat": { "id": -100_123, "type": "channel", "title": "Source", "username": username },
                "text": "hello"
            }
        }).to_string())
        .expect("deserialize channel post")
    }

    fn handle(s: &str) -> ChatHandle {
        ChatHandle::parse(s).unwrap()
    }

    fn relay_state() -> BotState {
        let mut state = BotState {
            forward: true,
            groups: vec![handle("@g1"), handle("@g2")],
            ..Default::default()
        };
        state.link_channel(UserId(USER), handle("@src"));
        state
    }

    #[tokio::test]
    async fn start_sends_review_to_owner() {
        let server = MockServer::start(&[]).await;
        let ctx = context(&server, BotState::default(), StaticLookup::default()).await;

        handle_update(&ctx, private_text(USER, "/start")).await.unwrap();

        let sent = server.calls("SendMessage");
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0]["chat_id"], json!(OWNER));
        assert!(sent[0]["text"].as_str().unwrap().contains("@ann"));
        assert_eq!(
            sent[0]["reply_markup"]["inline_keyboard"][0][0]["callback_data"],
            "approve:42"
        );
        assert_eq!(sent[1]["chat_id"], json!(USER));
        assert_eq!(sent[1]["text"], texts::REQUEST_SENT);
        assert_eq!(
            ctx.service.status(UserId(USER)).await,
            ApprovalStatus::Pending
        );
    }

    #[tokio::test]
    async fn start_without_membership_prompts_to_join() {
        let server = MockServer::start(&[]).await;
        let state = BotState {
            joins: vec![handle("@news")],
            ..Default::default()
        };
        let ctx = context(&server, state, StaticLookup::default()).await;

        handle_update(&ctx, private_text(USER, "/start@relay_bot"))
            .await
            .unwrap();

        let sent = server.calls("SendMessage");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["text"], texts::JOIN_REQUIRED);
        assert_eq!(
            sent[0]["reply_markup"]["inline_keyboard"][0][0]["url"],
            "https://t.me/news"
        );
        assert_eq!(
            ctx.service.status(UserId(USER)).await,
            ApprovalStatus::Unknown
        );
    }

    #[tokio::test]
    async fn failed_lookup_reports_unverifiable_membership() {
        let server = MockServer::start(&[]).await;
        let state = BotState {
            joins: vec![handle("@news"), handle("@private")],
            ..Default::default()
        };
        let lookup = StaticLookup::default()
            .with("@news", USER, MemberStatus::Member)
            .failing("@private");
        let ctx = context(&server, state, lookup).await;

        handle_update(&ctx, private_text(USER, "/start")).await.unwrap();

        let sent = server.calls("SendMessage");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["chat_id"], json!(USER));
        assert_eq!(sent[0]["text"], texts::VERIFY_FAILED);
        assert_eq!(
            sent[0]["reply_markup"]["inline_keyboard"][0][0]["url"],
            "https://t.me/private"
        );
        assert!(!sent.iter().any(|m| m["chat_id"] == json!(OWNER)));
        assert_eq!(
            ctx.service.status(UserId(USER)).await,
            ApprovalStatus::Unknown
        );
    }

    #[tokio::test]
    async fn check_join_after_joining_files_request() {
        let server = MockServer::start(&[]).await;
        let state = BotState {
            joins: vec![handle("@news")],
            ..Default::default()
        };
        let lookup = StaticLookup::default().with("@news", USER, MemberStatus::Member);
        let ctx = context(&server, state, lookup).await;

        handle_update(&ctx, callback(USER, "check_join")).await.unwrap();

        assert_eq!(server.calls("AnswerCallbackQuery").len(), 1);
        assert_eq!(
            ctx.service.status(UserId(USER)).await,
            ApprovalStatus::Pending
        );
        let sent = server.calls("SendMessage");
        assert!(sent.iter().any(|m| m["chat_id"] == json!(OWNER)));
    }

    #[tokio::test]
    async fn owner_approval_notifies_user_and_clears_buttons() {
        let server = MockServer::start(&[]).await;
        let mut state = BotState::default();
        state.set_approval(UserId(USER), ApprovalStatus::Pending);
        let ctx = context(&server, state, StaticLookup::default()).await;

        handle_update(&ctx, callback(OWNER, "approve:42")).await.unwrap();

        assert_eq!(
            ctx.service.status(UserId(USER)).await,
            ApprovalStatus::Approved
        );
        let sent = server.calls("SendMessage");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["chat_id"], json!(USER));
        assert_eq!(sent[0]["text"], texts::APPROVED_NOTICE);
        assert_eq!(server.calls("EditMessageReplyMarkup").len(), 1);
        assert_eq!(server.calls("AnswerCallbackQuery")[0]["text"], "Approved");
    }

    #[tokio::test]
    async fn non_owner_decision_is_ignored() {
        let server = MockServer::start(&[]).await;
        let mut state = BotState::default();
        state.set_approval(UserId(USER), ApprovalStatus::Pending);
        let ctx = context(&server, state, StaticLookup::default()).await;

        handle_update(&ctx, callback(USER, "approve:42")).await.unwrap();

        assert_eq!(
            ctx.service.status(UserId(USER)).await,
            ApprovalStatus::Pending
        );
        assert!(server.calls("SendMessage").is_empty());
        assert!(server.calls("EditMessageReplyMarkup").is_empty());
        assert_eq!(server.calls("AnswerCallbackQuery").len(), 1);
    }

    #[tokio::test]
    async fn linked_post_is_forwarded_to_every_group() {
        let server = MockServer::start(&["@g1"]).await;
        let ctx = context(&server, relay_state(), StaticLookup::default()).await;

        handle_update(&ctx, channel_post("src")).await.unwrap();

        let mut forwarded = server.calls("ForwardMessage");
        forwarded.sort_by_key(|b| b["chat_id"].as_str().unwrap_or_default().to_string());
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[0]["chat_id"], "@g1");
        assert_eq!(forwarded[1]["chat_id"], "@g2");
        assert_eq!(forwarded[1]["from_chat_id"], json!(-100_123));
        assert_eq!(forwarded[1]["message_id"], json!(5));
    }

    #[tokio::test]
    async fn unlinked_post_is_not_forwarded() {
        let server = MockServer::start(&[]).await;
        let ctx = context(&server, relay_state(), StaticLookup::default()).await;

        handle_update(&ctx, channel_post("other")).await.unwrap();

        assert!(server.calls("ForwardMessage").is_empty());
    }

    #[tokio::test]
    async fn invalid_prompt_input_clears_the_prompt() {
        let server = MockServer::start(&[]).await;
        let lookup = StaticLookup::default().with("@g1", SERVICE, MemberStatus::Administrator);
        let ctx = context(&server, BotState::default(), lookup).await;

        handle_update(&ctx, private_text(OWNER, MenuItem::AddGroup.label()))
            .await
            .unwrap();
        assert_eq!(
            ctx.service.sessions().peek(UserId(OWNER)),
            Some(PendingAction::AddGroup)
        );

        handle_update(&ctx, private_text(OWNER, "g1")).await.unwrap();
        assert_eq!(ctx.service.sessions().peek(UserId(OWNER)), None);

        handle_update(&ctx, private_text(OWNER, "@g1")).await.unwrap();
        assert!(ctx.service.store().snapshot().await.groups.is_empty());
        assert_eq!(server.calls("SendMessage").len(), 2);
    }

    #[tokio::test]
    async fn owner_adds_group_through_the_menu() {
        let server = MockServer::start(&[]).await;
        let lookup = StaticLookup::default().with("@g1", SERVICE, MemberStatus::Administrator);
        let ctx = context(&server, BotState::default(), lookup).await;

        handle_update(&ctx, private_text(OWNER, MenuItem::AddGroup.label()))
            .await
            .unwrap();
        handle_update(&ctx, private_text(OWNER, "@g1")).await.unwrap();
        handle_update(&ctx, private_text(OWNER, MenuItem::StartForwarding.label()))
            .await
            .unwrap();

        let state = ctx.service.store().snapshot().await;
        assert_eq!(state.groups, vec![handle("@g1")]);
        assert!(state.forward);
        let sent = server.calls("SendMessage");
        assert_eq!(sent.last().unwrap()["text"], texts::FORWARD_ON);
    }

    #[tokio::test]
    async fn other_menu_item_closes_open_prompt() {
        let server = MockServer::start(&[]).await;
        let lookup = StaticLookup::default().with("@g1", SERVICE, MemberStatus::Administrator);
        let ctx = context(&server, BotState::default(), lookup).await;

        handle_update(&ctx, private_text(OWNER, MenuItem::AddGroup.label()))
            .await
            .unwrap();
        handle_update(&ctx, private_text(OWNER, MenuItem::Help.label()))
            .await
            .unwrap();
        assert_eq!(ctx.service.sessions().peek(UserId(OWNER)), None);

        handle_update(&ctx, private_text(OWNER, "@g1")).await.unwrap();

        assert!(ctx.service.store().snapshot().await.groups.is_empty());
        let sent = server.calls("SendMessage");
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1]["text"], texts::HELP);
    }

    #[tokio::test]
    async fn owner_labels_from_users_are_not_menu_items() {
        let server = MockServer::start(&[]).await;
        let mut state = BotState::default();
        state.set_approval(UserId(USER), ApprovalStatus::Approved);
        let ctx = context(&server, state, StaticLookup::default()).await;

        handle_update(&ctx, private_text(USER, MenuItem::StartForwarding.label()))
            .await
            .unwrap();

        assert!(!ctx.service.store().snapshot().await.forward);
        assert!(server.calls("SendMessage").is_empty());
    }

    #[test]
    fn command_names() {
        assert_eq!(command("/start"), Some("start"));
        assert_eq!(command("/start@relay_bot payload"), Some("start"));
        assert_eq!(command("@news"), None);
    }
}
