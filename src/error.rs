//! Failure taxonomy shared by the dispatcher and the CyREST client.

use thiserror::Error;

/// Every way a tool call can fail.
///
/// Validation failures are produced before any call leaves the process.
/// The remaining variants come back from the Cytoscape side and are turned
/// into an `Error:` text block at the handler boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToolError {
    #[error("invalid argument '{param}': {reason}")]
    Validation { param: String, reason: String },

    #[error("{0}")]
    NotFound(String),

    #[error("authorization failed: {0}")]
    Authorization(String),

    #[error("{0}")]
    ExternalCall(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("precondition failed: {0}")]
    Precondition(String),
}

impl ToolError {
    pub fn validation(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure was raised locally, before any external call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Stable short label, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound(_) => "not_found",
            Self::Authorization(_) => "authorization",
            Self::ExternalCall(_) => "external_call",
            Self::Unsupported(_) => "unsupported",
            Self::Precondition(_) => "precondition",
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::ExternalCall(format!("request to Cytoscape timed out: {}", e))
        } else if e.is_connect() {
            Self::ExternalCall(format!(
                "could not connect to Cytoscape (is it running with CyREST enabled?): {}",
                e
            ))
        } else {
            Self::ExternalCall(format!("request to Cytoscape failed: {}", e))
        }
    }
}

pub type ToolOutcome<T> = std::result::Result<T, ToolError>;
