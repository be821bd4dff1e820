pub mod check;
pub mod reply;
pub mod schema;
pub mod stream;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use crate::catalog::Catalog;
use crate::config::{Config, Overrides};
use crate::error::ExitError;
use crate::reply::{Responder, Settings};

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Config file (default: .prequelbot.toml or .prequelbot.json in the current directory)
    #[arg(long, global = true, env = "PREQUELBOT_CONFIG")]
    pub config: Option<PathBuf>,
    /// Rule catalog file (TOML or JSON); the built-in catalog is used when unset
    #[arg(long, global = true, env = "PREQUELBOT_CATALOG")]
    pub catalog: Option<PathBuf>,
    /// The bot's own account name
    #[arg(long, global = true, env = "REDDIT_USER")]
    pub username: Option<String>,
    /// Source code link placed in every footer
    #[arg(long, global = true, env = "GITHUB_SOURCE_URL")]
    pub source_url: Option<String>,
    /// Issue tracker link placed in every footer
    #[arg(long, global = true, env = "GITHUB_ISSUES_URL")]
    pub issues_url: Option<String>,
}

/// Loaded config plus where the catalog comes from.
pub struct Loaded {
    pub config: Config,
    pub overrides: Overrides,
    pub catalog_path: Option<PathBuf>,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            username: self.username.clone(),
            source_url: self.source_url.clone(),
            issues_url: self.issues_url.clone(),
            catalog: self.catalog.clone(),
        }
    }

    /// Read the config file (if any) and merge in flags and environment.
    pub fn load(&self) -> anyhow::Result<Loaded> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        let (config, base) = Config::discover(self.config.as_deref(), &cwd)?;
        let overrides = self.overrides();
        let catalog_path = config.catalog_path(&overrides, &base);
        Ok(Loaded {
            config,
            overrides,
            catalog_path,
        })
    }
}

impl Loaded {
    /// Load and validate the catalog. Any defect aborts here.
    pub fn catalog(&self) -> Result<Catalog, ExitError> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading catalog");
                Catalog::load(path)?
            }
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }

    /// Human-readable catalog origin.
    pub fn catalog_source(&self) -> String {
        self.catalog_path
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string())
    }

    pub fn settings(&self) -> Result<Settings, ExitError> {
        self.config.settings(&self.overrides)
    }

    /// Build a responder: settings first, so a missing username fails before
    /// the catalog is compiled.
    pub fn responder(&self) -> anyhow::Result<Responder> {
        let settings = self.settings()?;
        let catalog = self.catalog()?;
        Ok(Responder::new(Arc::new(catalog), settings))
    }
}
