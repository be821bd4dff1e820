use std::path::PathBuf;
use std::process::ExitCode;

/// Errors that cause prequelbot to exit with a specific code.
#[derive(Debug, thiserror::Error)]
pub enum ExitError {
    #[error("config error: {0}")]
    Config(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{message}")]
    WithCode { code: u8, message: String },
}

impl ExitError {
    pub const fn new(code: u8, message: String) -> Self {
        ExitError::WithCode { code, message }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            ExitError::Config(_) => ExitCode::from(2),
            ExitError::Catalog(_) => ExitCode::from(3),
            ExitError::WithCode { code, .. } => ExitCode::from(*code),
        }
    }
}

/// Defects in a rule catalog. These are raised while the catalog is loaded,
/// never while a message is being answered.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog document: {0}")]
    Parse(String),

    #[error("{category} rule #{index}: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        category: &'static str,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "{category} rule #{index}: template uses `{placeholder}` but the pattern only has {groups} capture group(s)"
    )]
    GroupOutOfRange {
        category: &'static str,
        index: usize,
        placeholder: String,
        groups: usize,
    },

    #[error("{category} rule #{index}: neither `response` nor `responses` is set")]
    MissingResponse { category: &'static str, index: usize },

    #[error("{category} rule #{index}: `responses` is empty")]
    EmptyResponses { category: &'static str, index: usize },

    #[error("footer pool `{0}` is empty")]
    EmptyFooterPool(&'static str),

    #[error("invalid footer template: {0}")]
    FooterTemplate(#[source] minijinja::Error),
}

/// Failures while rendering a reply for one message.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The pattern defines the group, but this particular match left it unset.
    #[error("`{placeholder}` refers to capture group {group}, which did not participate in the match")]
    GroupUnset { placeholder: String, group: usize },

    #[error("rendering footer: {0}")]
    Footer(#[source] minijinja::Error),
}
