use std::path::Path;

use {
    anyhow::Result,
    clap::Subcommand,
    relaygate_store::{ApprovalStatus, BotState, FileStore, StateStore},
};

use crate::ResolvedConfig;

#[derive(Subcommand)]
pub enum StateAction {
    /// Print the persisted state as JSON.
    Show {
        /// Print counts instead of the full document.
        #[arg(long)]
        summary: bool,
    },
    /// Print the state file location.
    Path,
}

pub async fn handle_state(action: StateAction, resolved: &ResolvedConfig) -> Result<()> {
    let path = resolved.state_path();
    match action {
        StateAction::Show { summary } => {
            let state = load(&path).await?;
            if summary {
                println!("{}", summarize(&state));
            } else {
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
        },
        StateAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

async fn load(path: &Path) -> Result<BotState> {
    if !path.exists() {
        eprintln!("No state file at {}; showing defaults.", path.display());
    }
    Ok(FileStore::new(path).load().await?)
}

fn summarize(state: &BotState) -> String {
    let count = |wanted: ApprovalStatus| state.users.values().filter(|s| **s == wanted).count();
    format!(
        "users: {} approved, {} pending, {} rejected\n\
         linked channels: {}\n\
         destination groups: {}\n\
         mandatory channels: {}\n\
         forwarding: {}",
        count(ApprovalStatus::Approved),
        count(ApprovalStatus::Pending),
        count(ApprovalStatus::Rejected),
        state.user_channels.len(),
        state.groups.len(),
        state.joins.len(),
        if state.forward { "on" } else { "off" },
    )
}
