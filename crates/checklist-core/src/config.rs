use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, anyhow};
use checklist_shared::UserId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ENV_CONFIG: &str = "CHECKLIST_CONFIG";
const ENV_API_URL: &str = "CHECKLIST_API_URL";
const ENV_USER_ID: &str = "CHECKLIST_USER_ID";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    #[serde(skip)]
    pub loaded_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_id: Option<UserId>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Reads the config file (if any) and then the `CHECKLIST_*` environment.
    #[tracing::instrument(skip(config_override))]
    pub fn load(config_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match resolve_config_path(config_override)? {
            Some(path) => {
                info!(config = %path.display(), "loading config");
                Self::load_file(&path)?
            }
            None => {
                warn!("no config file found; using defaults");
                Self::default()
            }
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        cfg.loaded_files.push(path.to_path_buf());
        Ok(cfg)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(key = ENV_API_URL, "applying environment override");
            self.set("api.base_url", &url)?;
        }
        if let Some(user_id) = lookup(ENV_USER_ID) {
            debug!(key = ENV_USER_ID, "applying environment override");
            self.set("api.user_id", &user_id)
                .with_context(|| format!("invalid {ENV_USER_ID}"))?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in overrides {
            let key = k.strip_prefix("rc.").unwrap_or(&k).to_string();
            debug!(key = %key, value = %v, "applying override");
            self.set(&key, &v)?;
        }
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let value = value.trim();
        match key {
            "api.base_url" => {
                if value.is_empty() {
                    return Err(anyhow!("api.base_url cannot be empty"));
                }
                self.api.base_url = value.to_string();
            }
            "api.user_id" => {
                self.api.user_id = if value.is_empty() {
                    None
                } else {
                    let id = value
                        .parse::<u64>()
                        .with_context(|| format!("api.user_id must be a number, got `{value}`"))?;
                    Some(UserId(id))
                };
            }
            "api.timeout_secs" => {
                let secs = value
                    .parse::<u64>()
                    .with_context(|| format!("api.timeout_secs must be a number, got `{value}`"))?;
                if secs == 0 {
                    return Err(anyhow!("api.timeout_secs must be at least 1"));
                }
                self.api.timeout_secs = secs;
            }
            "ui.color" => self.ui.color = parse_bool(value)?,
            other => return Err(anyhow!("unknown config key: {other}")),
        }
        Ok(())
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.api.user_id
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }
}

#[tracing::instrument(skip(override_path))]
fn resolve_config_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(config_env) = std::env::var(ENV_CONFIG) {
        if config_env == "/dev/null" {
            return Ok(None);
        }
        return Ok(Some(PathBuf::from(config_env)));
    }

    let Some(config_dir) = dirs::config_dir() else {
        debug!("cannot determine config directory");
        return Ok(None);
    };
    let candidate = config_dir.join("checklist").join("config.toml");
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        other => Err(anyhow!("invalid color setting: {other}")),
    }
}
