//! Footer appended to every reply.

use minijinja::{Environment, context};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, RenderError};
use crate::picker::{IndexPicker, pick};

const FOOTER_TEMPLATE_NAME: &str = "footer.md";
const FOOTER_TEMPLATE: &str = include_str!("templates/footer.md.jinja");

/// Footer pools as written in the catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FooterDef {
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default, alias = "sourceCodeTexts")]
    pub source_code_texts: Vec<String>,
    #[serde(default, alias = "issuesTexts")]
    pub issues_texts: Vec<String>,
}

/// Project links embedded in every footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub source_url: String,
    pub issues_url: String,
}

/// Validated footer pools with the compiled layout template.
#[derive(Debug, Clone)]
pub struct Footer {
    pools: FooterDef,
    env: Environment<'static>,
}

impl Footer {
    /// Build a footer from its pools. Every pool must be non-empty.
    pub fn new(pools: FooterDef) -> Result<Self, CatalogError> {
        if pools.signatures.is_empty() {
            return Err(CatalogError::EmptyFooterPool("signatures"));
        }
        if pools.source_code_texts.is_empty() {
            return Err(CatalogError::EmptyFooterPool("source_code_texts"));
        }
        if pools.issues_texts.is_empty() {
            return Err(CatalogError::EmptyFooterPool("issues_texts"));
        }

        let mut env = Environment::new();
        env.add_template(FOOTER_TEMPLATE_NAME, FOOTER_TEMPLATE)
            .map_err(CatalogError::FooterTemplate)?;

        Ok(Self { pools, env })
    }

    pub const fn pools(&self) -> &FooterDef {
        &self.pools
    }

    /// Append the footer to `message`, picking one entry from each pool.
    pub fn append(
        &self,
        message: &str,
        links: &Links,
        picker: &mut dyn IndexPicker,
    ) -> Result<String, RenderError> {
        // Pools are checked non-empty in `new`, so the fallbacks never apply.
        let signature = pick(picker, &self.pools.signatures).map_or("", String::as_str);
        let source_text = pick(picker, &self.pools.source_code_texts).map_or("", String::as_str);
        let issues_text = pick(picker, &self.pools.issues_texts).map_or("", String::as_str);

        let template = self
            .env
            .get_template(FOOTER_TEMPLATE_NAME)
            .map_err(RenderError::Footer)?;

        template
            .render(context! {
                message,
                signature,
                source_text,
                source_url => &links.source_url,
                issues_text,
                issues_url => &links.issues_url,
            })
            .map_err(RenderError::Footer)
    }
}
