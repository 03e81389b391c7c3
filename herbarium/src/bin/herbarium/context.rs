use anyhow::{Context, Result};
use herbarium::routes::{DEFAULT_API_BASE, DEFAULT_VIEW_BASE, RouteContext};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_BASE_ENV: &str = "HERBARIUM_API_BASE";
pub const VIEW_BASE_ENV: &str = "HERBARIUM_VIEW_BASE";

/// Configuration stored in .herbarium/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HerbariumConfig {
    #[serde(default)]
    pub routes: RouteSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_view_base")]
    pub view_base: String,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            view_base: default_view_base(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_view_base() -> String {
    DEFAULT_VIEW_BASE.to_string()
}

/// Resolved configuration plus where it came from
pub struct CatalogContext {
    /// Path of the config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    pub config: HerbariumConfig,
}

impl CatalogContext {
    /// Load configuration from the current directory or its ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Walk up from `start` looking for .herbarium/config.toml. Defaults apply
    /// when none is found; environment variables override either way.
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();
        let config_path = loop {
            let candidate = current.join(".herbarium").join("config.toml");
            if candidate.exists() {
                break Some(candidate);
            }
            if !current.pop() {
                break None;
            }
        };

        let mut config = match &config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => HerbariumConfig::default(),
        };
        apply_env_overrides(&mut config);

        log::debug!(
            "routes: api={} view={} (config: {:?})",
            config.routes.api_base,
            config.routes.view_base,
            config_path
        );
        Ok(Self { config_path, config })
    }

    pub fn routes(&self) -> RouteContext {
        RouteContext::new(&self.config.routes.api_base, &self.config.routes.view_base)
    }
}

fn apply_env_overrides(config: &mut HerbariumConfig) {
    if let Ok(value) = std::env::var(API_BASE_ENV)
        && !value.is_empty()
    {
        config.routes.api_base = value;
    }
    if let Ok(value) = std::env::var(VIEW_BASE_ENV)
        && !value.is_empty()
    {
        config.routes.view_base = value;
    }
}
