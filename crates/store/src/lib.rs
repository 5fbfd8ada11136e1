//! Durable bot state: approvals, channel links, destination groups,
//! mandatory channels and the forwarding toggle.
//! Persistent storage at `<data_dir>/db.json` by default.

pub mod error;
pub mod state;
pub mod store;
pub mod store_file;
pub mod store_memory;

pub use {
    error::{Error, Result},
    state::{ApprovalStatus, BotState},
    store::{ConfigStore, StateStore},
    store_file::FileStore,
    store_memory::InMemoryStore,
};
