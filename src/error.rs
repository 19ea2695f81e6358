use thiserror::Error;

/// Failure of a single source while collecting packages.
///
/// None of these abort a scan: the collector that hit one contributes
/// zero records and the remaining sources still run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The backing tool is not installed on this host
    #[error("tool not found: {0}")]
    ToolMissing(String),

    /// The process could not be started
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },

    /// The process ran but reported failure
    #[error("{program} exited with status {code:?}")]
    ExitStatus { program: String, code: Option<i32> },

    /// A registry key or value could not be read
    #[error("registry error: {0}")]
    Registry(String),
}

impl ScanError {
    /// True when the error only means the source is absent on this host.
    #[must_use]
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, ScanError::ToolMissing(_))
    }
}
