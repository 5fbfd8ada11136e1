//! Relays channel posts from linked source channels to destination groups.

pub mod forward;

pub use forward::{ChannelPost, ForwardRouter, PostRelay, RelayFailure, RelayReport, RouteDecision};
