use anyhow::{Context, Result};
use gitgud_core::Charset;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "gitgud.toml";

/// Display and logging settings read from `gitgud.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub charset: Charset,
    pub color: bool,
    pub max_lanes: usize,
    pub log_level: String,
    pub show_stats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            charset: Charset::Unicode,
            color: false,
            max_lanes: 8,
            log_level: "warn".to_string(),
            show_stats: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        if config.max_lanes == 0 {
            anyhow::bail!("max_lanes must be at least 1");
        }
        Ok(config)
    }

    /// Load `explicit` if given, else `gitgud.toml` in `dir` if it exists,
    /// else the defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            Ok(Self::default())
        }
    }
}
