use thiserror::Error;

use crate::database::DatabaseError;
use crate::media::MediaError;

#[derive(Error, Debug)]
pub enum ListError {
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(String),

    #[error("Unknown filter column '{column}' for resource '{resource}'")]
    UnknownColumn { resource: String, column: String },

    #[error("Unknown sort key '{key}' for resource '{resource}'")]
    UnknownSortKey { resource: String, key: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl ListError {
    /// Caller mistakes, as opposed to failures of a backing store.
    pub fn is_validation(&self) -> bool {
        !matches!(self, ListError::Database(_) | ListError::Media(_))
    }
}
