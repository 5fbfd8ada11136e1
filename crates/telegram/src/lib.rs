//! Telegram transport for relaygate.
//!
//! Long-polls the Bot API with teloxide, turns private messages, button
//! presses and channel posts into calls on the access service and the
//! forward router, and renders their outcomes back as messages and
//! keyboards.

pub mod bot;
pub mod error;
pub mod handlers;
pub mod keyboards;
pub mod lookup;
pub mod outbound;
pub mod state;
pub mod texts;

pub use {
    bot::{PollingHandle, start_polling},
    error::{Error, Result},
    lookup::TelegramMembership,
    outbound::TelegramOutbound,
    state::RelayContext,
};
