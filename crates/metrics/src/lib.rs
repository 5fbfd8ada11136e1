//! Metrics collection and export for relaygate.
//!
//! Library crates record through the `metrics` facade behind their own
//! optional `metrics` feature. Without an installed recorder every macro is
//! a no-op. With the `prometheus` feature, [`init_metrics`] installs an
//! exporter that serves the text format over HTTP.
//!
//! ```rust,ignore
//! use relaygate_metrics::{counter, relay};
//!
//! counter!(relay::ATTEMPTS_TOTAL).increment(1);
//! ```

mod definitions;
mod recorder;

pub use {
    definitions::*,
    recorder::{MetricsRecorderConfig, init_metrics},
};

pub use metrics::{counter, gauge, histogram};
