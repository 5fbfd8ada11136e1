use std::path::{Path, PathBuf};

use secrecy::Secret;

use crate::{env_subst::substitute_env, schema::RelaygateConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "relaygate.toml",
    "relaygate.yaml",
    "relaygate.yml",
    "relaygate.json",
];

const STATE_FILENAME: &str = "db.json";

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<RelaygateConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = project_dirs() {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user data directory (`~/.local/share/relaygate/` on Linux).
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().to_path_buf())
}

/// State file used when `state.path` is not configured.
pub fn default_state_path() -> PathBuf {
    data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_FILENAME)
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "relaygate")
}

/// Values supplied on the command line or through the environment. Each
/// `Some` replaces the file value.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub owner_id: Option<u64>,
    pub state_path: Option<PathBuf>,
}

pub fn apply_overrides(config: &mut RelaygateConfig, overrides: ConfigOverrides) {
    if let Some(token) = overrides.token.filter(|t| !t.trim().is_empty()) {
        config.telegram.token = Secret::new(token);
    }
    if let Some(owner_id) = overrides.owner_id {
        config.telegram.owner_id = Some(owner_id);
    }
    if let Some(path) = overrides.state_path {
        config.state.path = Some(path);
    }
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<RelaygateConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
