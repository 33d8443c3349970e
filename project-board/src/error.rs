use thiserror::Error;

use crate::domain::ProjectId;

/// Errors that can occur while loading, reordering or persisting projects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoardError {
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("network error: {0}")]
    Network(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("parsing error: {0}")]
    Parsing(String),
}

impl BoardError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
