//! Error types shared by the configuration layer and the simulation core.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a simulation run before or while it executes.
#[derive(Debug, Error)]
pub enum SimError {
    /// A caller supplied a value the core cannot work with, such as an
    /// empty probability table.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The scenario failed validation; every offending field is listed.
    #[error("invalid scenario ({} error(s)): {}", .0.len(), join_errors(.0))]
    Config(Vec<ConfigError>),
}

impl SimError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
