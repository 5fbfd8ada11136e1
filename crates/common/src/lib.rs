//! Identifiers shared across relaygate crates: user ids and marker-prefixed
//! chat handles.

pub mod error;
pub mod types;

pub use {
    error::{Error, Result},
    types::{ChatHandle, HANDLE_MARKER, UserId},
};
