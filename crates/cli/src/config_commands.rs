use {anyhow::Result, clap::Subcommand};

use relaygate_config::{Severity, ValidationResult, validate};

use crate::ResolvedConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the resolved configuration with the token redacted.
    Show,
}

pub fn handle_config(action: ConfigAction, resolved: &ResolvedConfig) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(resolved, verbose),
        ConfigAction::Show => show(resolved),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(resolved: &ResolvedConfig, verbose: bool) -> Result<()> {
    let result = validate(&resolved.config, resolved.path.clone());

    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults and environment.\n");
    }

    for line in render(&result, verbose) {
        eprintln!("{line}");
    }

    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn render(result: &ValidationResult, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let (color, label) = match d.severity {
            Severity::Error => (RED, "error"),
            Severity::Warning => (YELLOW, "warning"),
            Severity::Info => (CYAN, "info"),
        };

        if d.path.is_empty() {
            lines.push(format!("  {BOLD}{color}{label}{RESET} {}", d.message));
        } else {
            lines.push(format!(
                "  {BOLD}{color}{label}{RESET} {}: {}",
                d.path, d.message
            ));
        }
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if !lines.is_empty() {
        lines.push(String::new());
    }

    if errors == 0 && warnings == 0 {
        lines.push("No issues found.".to_string());
    } else {
        lines.push(format!("{errors} error(s), {warnings} warning(s)"));
    }
    lines
}

fn show(resolved: &ResolvedConfig) -> Result<()> {
    let mut value = serde_json::to_value(&resolved.config)?;
    if let Some(token) = value.pointer_mut("/telegram/token")
        && token.as_str().is_some_and(|t| !t.is_empty())
    {
        *token = serde_json::Value::String("[REDACTED]".into());
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    println!("# state file: {}", resolved.state_path().display());
    Ok(())
}
