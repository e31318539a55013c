use std::time::Duration;

/// Why a page could not be brought into the outlet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load page: {0}")]
    Failed(String),

    #[error("page load timed out after {0:?}")]
    TimedOut(Duration),
}

impl LoadError {
    pub fn failed(reason: impl Into<String>) -> Self {
        LoadError::Failed(reason.into())
    }
}
