use thiserror::Error;

/// Errors raised while loading a table configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse table config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid table config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}
