use std::sync::Arc;

use {
    relaygate_access::{AccessService, MembershipLookup, Notifier},
    relaygate_common::UserId,
    relaygate_routing::{ForwardRouter, PostRelay},
    relaygate_store::ConfigStore,
    teloxide::Bot,
};

use crate::{lookup::TelegramMembership, outbound::TelegramOutbound};

/// Everything an update handler needs.
pub struct RelayContext {
    pub bot: Bot,
    pub outbound: TelegramOutbound,
    pub service: AccessService,
    pub router: ForwardRouter,
}

impl RelayContext {
    /// `service_id` is the bot's own user id, used for administrator checks.
    pub fn new(bot: Bot, store: Arc<ConfigStore>, owner: UserId, service_id: UserId) -> Self {
        let lookup = Arc::new(TelegramMembership::new(bot.clone()));
        Self::with_lookup(bot, store, lookup, owner, service_id)
    }

    /// Same as [`RelayContext::new`] with a caller-supplied membership lookup.
    pub fn with_lookup(
        bot: Bot,
        store: Arc<ConfigStore>,
        lookup: Arc<dyn MembershipLookup>,
        owner: UserId,
        service_id: UserId,
    ) -> Self {
        let outbound = TelegramOutbound::new(bot.clone());
        let shared = Arc::new(outbound.clone());
        let service = AccessService::new(
            Arc::clone(&store),
            lookup,
            Arc::clone(&shared) as Arc<dyn Notifier>,
            owner,
            service_id,
        );
        let router = ForwardRouter::new(store, shared as Arc<dyn PostRelay>);
        Self {
            bot,
            outbound,
            service,
            router,
        }
    }

    pub fn owner(&self) -> UserId {
        self.service.owner()
    }
}
