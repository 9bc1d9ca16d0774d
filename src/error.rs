//! Application error types.
//!
//! Every error carries a stable `E_*` code and a retryable flag through
//! [`ErrorCode`], so hosts can surface failures without matching on variants.

use uuid::Uuid;

/// Stable machine-readable code for an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// A configuration value could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{key} must be positive, got {value}")]
    NotPositive { key: &'static str, value: f64 },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "E_CONFIG_INVALID",
            Self::NotPositive { .. } => "E_CONFIG_NOT_POSITIVE",
        }
    }
}

// =============================================================================
// AI
// =============================================================================

/// Failures from the AI collaborators or from interpreting their output.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The completion or embedding service failed.
    #[error("service request failed: {message}")]
    Service { message: String, retryable: bool },

    /// The model answered with something that isn't the JSON we asked for.
    #[error("could not parse model output: {0}")]
    Parse(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid input for {tool}: {message}")]
    ToolInput { tool: &'static str, message: String },

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
}

impl ErrorCode for AiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Service { .. } => "E_AI_SERVICE",
            Self::Parse(_) => "E_AI_PARSE",
            Self::UnknownTool(_) => "E_UNKNOWN_TOOL",
            Self::ToolInput { .. } => "E_TOOL_INPUT",
            Self::Workspace(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Service { retryable: true, .. })
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

// =============================================================================
// WORKSPACE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("tab not found: {0}")]
    TabNotFound(Uuid),

    #[error("cannot remove the last tab")]
    LastTab,

    #[error("active tab {active} out of range for {tabs} tabs")]
    InvalidActive { active: usize, tabs: usize },
}

impl ErrorCode for WorkspaceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TabNotFound(_) => "E_TAB_NOT_FOUND",
            Self::LastTab => "E_LAST_TAB",
            Self::InvalidActive { .. } => "E_INVALID_ACTIVE_TAB",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
