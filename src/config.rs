use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ExitError;
use crate::footer::Links;
use crate::reply::Settings;

/// Config file name constants.
pub const CONFIG_TOML: &str = ".prequelbot.toml";
pub const CONFIG_JSON: &str = ".prequelbot.json";

/// Find the config file path, preferring .prequelbot.toml over .prequelbot.json.
/// Returns None if neither exists.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let toml_path = dir.join(CONFIG_TOML);
    if toml_path.exists() {
        return Some(toml_path);
    }
    let json_path = dir.join(CONFIG_JSON);
    if json_path.exists() {
        return Some(json_path);
    }
    None
}

/// Top-level .prequelbot.toml config.
///
/// All structs use snake_case (TOML native) with `alias` attributes so
/// camelCase JSON configs load too. Every field is optional here; missing
/// values must come from flags or the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub links: LinksConfig,
    /// Rule catalog file, relative to the config file's directory.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// The bot's own account name.
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default, alias = "sourceUrl")]
    pub source_url: Option<String>,
    #[serde(default, alias = "issuesUrl")]
    pub issues_url: Option<String>,
}

/// Values supplied on the command line or through the environment.
/// They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub source_url: Option<String>,
    pub issues_url: Option<String>,
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Load config from a file (TOML or JSON, auto-detected by extension).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "toml" => Self::parse_toml(&contents),
            "json" => Self::parse_json(&contents),
            _ => {
                // Try TOML first, then JSON
                Self::parse_toml(&contents).or_else(|_| Self::parse_json(&contents))
            }
        }
    }

    /// Parse config from a TOML string.
    pub fn parse_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).map_err(|e| {
            ExitError::Config(format!("invalid {CONFIG_TOML}: {e}")).into()
        })
    }

    /// Parse config from a JSON string.
    pub fn parse_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ExitError::Config(format!("invalid {CONFIG_JSON}: {e}")).into()
        })
    }

    /// Load the config at `explicit`, or discover one in `dir`.
    /// Returns the config and the directory relative paths resolve against.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<(Self, PathBuf)> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            let base = path
                .parent()
                .map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
            return Ok((config, base));
        }
        match find_config(dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using config file");
                Ok((Self::load(&path)?, dir.to_path_buf()))
            }
            None => Ok((Self::default(), dir.to_path_buf())),
        }
    }

    /// Merge overrides over this config and produce responder settings.
    pub fn settings(&self, overrides: &Overrides) -> Result<Settings, ExitError> {
        let username = overrides
            .username
            .clone()
            .or_else(|| self.bot.username.clone())
            .ok_or_else(|| missing("bot username", "--username", "REDDIT_USER"))?;
        let source_url = overrides
            .source_url
            .clone()
            .or_else(|| self.links.source_url.clone())
            .ok_or_else(|| missing("source url", "--source-url", "GITHUB_SOURCE_URL"))?;
        let issues_url = overrides
            .issues_url
            .clone()
            .or_else(|| self.links.issues_url.clone())
            .ok_or_else(|| missing("issues url", "--issues-url", "GITHUB_ISSUES_URL"))?;

        if username.trim().is_empty() {
            return Err(ExitError::Config("bot username is empty".to_string()));
        }

        Ok(Settings {
            username,
            links: Links {
                source_url,
                issues_url,
            },
        })
    }

    /// Catalog file to load, if any. Overrides are used as given; the config
    /// value resolves against `base`.
    pub fn catalog_path(&self, overrides: &Overrides, base: &Path) -> Option<PathBuf> {
        overrides
            .catalog
            .clone()
            .or_else(|| self.catalog.as_ref().map(|p| base.join(p)))
    }
}

fn missing(what: &str, flag: &str, env: &str) -> ExitError {
    ExitError::Config(format!(
        "no {what} configured (set {flag}, {env}, or add it to {CONFIG_TOML})"
    ))
}
