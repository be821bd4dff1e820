//! Rule catalog: ordered rule categories plus footer pools.
//!
//! The catalog is parsed and validated once, then shared read-only. Every
//! defect (bad regex, missing response, placeholder past the last capture
//! group, empty footer pool) surfaces from [`Catalog::from_def`].

use std::fmt;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CatalogError, RenderError};
use crate::footer::{Footer, FooterDef};
use crate::message::Message;
use crate::picker::IndexPicker;
use crate::rule::{Rule, RuleDef};

/// Catalog shipped with the binary.
pub const DEFAULT_CATALOG: &str = include_str!("catalog/responses.json");

/// Class of trigger a rule list answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Replies to the bot's own messages.
    Replies,
    /// Plain messages anywhere.
    Messages,
    /// `!command` style requests.
    Commands,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Replies, Category::Messages, Category::Commands];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Replies => "replies",
            Category::Messages => "messages",
            Category::Commands => "commands",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog document as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogDef {
    /// Rules tried when someone answers one of the bot's own messages.
    #[serde(default)]
    pub replies: Vec<RuleDef>,
    /// Rules tried against every message.
    #[serde(default)]
    pub messages: Vec<RuleDef>,
    /// Command rules, tried last.
    #[serde(default)]
    pub commands: Vec<RuleDef>,
    pub footer: FooterDef,
}

impl CatalogDef {
    /// Parse a catalog from JSON.
    pub fn parse_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Parse a catalog from TOML.
    pub fn parse_toml(toml_str: &str) -> Result<Self, CatalogError> {
        toml::from_str(toml_str).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// A rule that matched, with its rendered text (footer not yet applied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub category: Category,
    pub index: usize,
    pub text: String,
}

/// Ordered, compiled rules of one category.
#[derive(Debug, Clone)]
pub struct RuleSet {
    category: Category,
    rules: Vec<Rule>,
}

impl RuleSet {
    fn compile(category: Category, defs: &[RuleDef]) -> Result<Self, CatalogError> {
        let rules = defs
            .iter()
            .enumerate()
            .map(|(index, def)| Rule::compile(def, category, index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { category, rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Try rules in declared order and return the first one that renders.
    ///
    /// A rule whose template reads a capture group the match left unset is
    /// skipped as if it had not matched.
    pub fn scan(&self, message: &Message, picker: &mut dyn IndexPicker) -> Option<Match> {
        for (index, rule) in self.rules.iter().enumerate() {
            match rule.render(message, picker) {
                Ok(Some(text)) => {
                    return Some(Match {
                        category: self.category,
                        index,
                        text,
                    });
                }
                Ok(None) => {}
                Err(RenderError::GroupUnset { placeholder, group }) => {
                    warn!(
                        category = %self.category,
                        index,
                        placeholder = %placeholder,
                        group,
                        "rule matched without the capture group its template needs, skipping"
                    );
                }
                Err(e) => {
                    warn!(category = %self.category, index, error = %e, "rule failed to render, skipping");
                }
            }
        }
        None
    }
}

/// Validated catalog, immutable after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    replies: RuleSet,
    messages: RuleSet,
    commands: RuleSet,
    footer: Footer,
}

impl Catalog {
    /// Compile and validate every rule and the footer pools.
    pub fn from_def(def: &CatalogDef) -> Result<Self, CatalogError> {
        Ok(Self {
            replies: RuleSet::compile(Category::Replies, &def.replies)?,
            messages: RuleSet::compile(Category::Messages, &def.messages)?,
            commands: RuleSet::compile(Category::Commands, &def.commands)?,
            footer: Footer::new(def.footer.clone())?,
        })
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_def(&CatalogDef::parse_json(DEFAULT_CATALOG)?)
    }

    /// Load a catalog file (TOML or JSON, detected by extension).
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let def = match ext {
            "toml" => CatalogDef::parse_toml(&contents)?,
            "json" => CatalogDef::parse_json(&contents)?,
            _ => CatalogDef::parse_json(&contents).or_else(|_| CatalogDef::parse_toml(&contents))?,
        };
        Self::from_def(&def)
    }

    pub const fn rules(&self, category: Category) -> &RuleSet {
        match category {
            Category::Replies => &self.replies,
            Category::Messages => &self.messages,
            Category::Commands => &self.commands,
        }
    }

    pub const fn footer(&self) -> &Footer {
        &self.footer
    }
}
