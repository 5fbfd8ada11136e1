//! Semantic checks run before the bot starts.

use std::{net::SocketAddr, path::PathBuf};

use secrecy::ExposeSecret;

use crate::schema::RelaygateConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "telegram.owner_id"
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate a fully resolved config (file values plus overrides).
pub fn validate(config: &RelaygateConfig, config_path: Option<PathBuf>) -> ValidationResult {
    let mut result = ValidationResult {
        diagnostics: Vec::new(),
        config_path,
    };

    let token = config.telegram.token.expose_secret();
    if token.trim().is_empty() {
        result.push(
            Severity::Error,
            "telegram.token",
            "bot token is missing (set it in the config file or BOT_TOKEN)",
        );
    } else if token.contains("${") {
        result.push(
            Severity::Error,
            "telegram.token",
            "bot token still contains an unresolved ${...} placeholder",
        );
    } else if !looks_like_bot_token(token) {
        result.push(
            Severity::Warning,
            "telegram.token",
            "bot token does not look like <bot id>:<secret>",
        );
    }

    if config.telegram.owner_id.is_none() {
        result.push(
            Severity::Error,
            "telegram.owner_id",
            "owner id is missing (set it in the config file or OWNER_ID)",
        );
    }

    if config.telegram.request_timeout_secs <= u64::from(config.telegram.poll_timeout_secs) {
        result.push(
            Severity::Warning,
            "telegram.request_timeout_secs",
            "HTTP timeout should exceed poll_timeout_secs or long polls get aborted",
        );
    }

    if config.telegram.poll_timeout_secs == 0 {
        result.push(
            Severity::Info,
            "telegram.poll_timeout_secs",
            "poll timeout 0 means short polling",
        );
    }

    if config.metrics.enabled && config.metrics.listen.parse::<SocketAddr>().is_err() {
        result.push(
            Severity::Error,
            "metrics.listen",
            format!("not a socket address: {}", config.metrics.listen),
        );
    }

    result
}

fn looks_like_bot_token(token: &str) -> bool {
    match token.split_once(':') {
        Some((id, secret)) => {
            !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !secret.is_empty()
        },
        None => false,
    }
}
