//! Configuration loading, env substitution and validation.
//!
//! Config files: `relaygate.toml`, `relaygate.yaml`, or `relaygate.json`
//! Searched in `./` then `~/.config/relaygate/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in the raw file.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{
        ConfigOverrides, apply_overrides, data_dir, default_state_path, find_config_file,
        load_config,
    },
    schema::{MetricsConfig, RelaygateConfig, StateConfig, TelegramConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
