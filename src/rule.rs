//! A single pattern rule: compiled regex plus its response templates.

use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Category;
use crate::error::{CatalogError, RenderError};
use crate::message::Message;
use crate::picker::{IndexPicker, pick};
use crate::template;

/// Rule as written in the catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RuleDef {
    /// Regular expression, matched case-insensitively in multi-line mode.
    /// `^` and `$` also match around `\r\n` line endings.
    pub pattern: String,
    /// Single response template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Response variants, one picked at random. Takes precedence over `response`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<String>>,
}

impl RuleDef {
    pub fn single(pattern: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            response: Some(response.into()),
            responses: None,
        }
    }

    pub fn variants(pattern: impl Into<String>, responses: Vec<String>) -> Self {
        Self {
            pattern: pattern.into(),
            response: None,
            responses: Some(responses),
        }
    }
}

#[derive(Debug, Clone)]
enum Templates {
    Single(String),
    Variants(Vec<String>),
}

impl Templates {
    fn as_slice(&self) -> &[String] {
        match self {
            Templates::Single(t) => std::slice::from_ref(t),
            Templates::Variants(list) => list,
        }
    }
}

/// A validated, compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    templates: Templates,
}

impl Rule {
    /// Compile and validate a rule definition.
    ///
    /// Rejects malformed patterns, rules without any response, and templates
    /// whose `$N` placeholders point past the pattern's capture groups.
    pub fn compile(def: &RuleDef, category: Category, index: usize) -> Result<Self, CatalogError> {
        let category = category.as_str();

        let regex = RegexBuilder::new(&def.pattern)
            .case_insensitive(true)
            .multi_line(true)
            .crlf(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                category,
                index,
                pattern: def.pattern.clone(),
                source,
            })?;

        let templates = match (&def.responses, &def.response) {
            (Some(list), _) if list.is_empty() => {
                return Err(CatalogError::EmptyResponses { category, index });
            }
            (Some(list), _) => Templates::Variants(list.clone()),
            (None, Some(single)) => Templates::Single(single.clone()),
            (None, None) => return Err(CatalogError::MissingResponse { category, index }),
        };

        let groups_len = regex.captures_len();
        for text in templates.as_slice() {
            for placeholder in template::placeholders(text) {
                match placeholder.group {
                    Some(group) if group < groups_len => {}
                    _ => {
                        return Err(CatalogError::GroupOutOfRange {
                            category,
                            index,
                            placeholder: placeholder.token.to_string(),
                            groups: groups_len - 1,
                        });
                    }
                }
            }
        }

        Ok(Self { regex, templates })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn templates(&self) -> &[String] {
        self.templates.as_slice()
    }

    /// Match the message body and render a response template.
    ///
    /// `Ok(None)` means the pattern did not match.
    pub fn render(
        &self,
        message: &Message,
        picker: &mut dyn IndexPicker,
    ) -> Result<Option<String>, RenderError> {
        let Some(captures) = self.regex.captures(&message.body) else {
            return Ok(None);
        };

        let chosen = match &self.templates {
            Templates::Single(t) => t.as_str(),
            Templates::Variants(list) => match pick(picker, list) {
                Some(t) => t.as_str(),
                None => return Ok(None),
            },
        };
        debug!(pattern = self.pattern(), template = chosen, "rule matched");

        template::render(chosen, &captures, &message.author.name).map(Some)
    }
}
