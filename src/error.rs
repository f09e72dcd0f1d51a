//! Defines the crate level error type and the failure outcome reported by transaction stores.

/// The errors that may occur in the concrete stores and the command-line driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested transaction was not found.
    ///
    /// For store operations, the caller should check that both the account ID
    /// and the transaction ID are correct and that the transaction has been
    /// added.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// A transaction was submitted without an owning account.
    #[error("a transaction must belong to an account")]
    EmptyAccountId,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the lock guarding the store's data.
    #[error("could not acquire the store lock")]
    StoreLockError,

    /// Logging could not be set up, e.g. because the log file could not be
    /// opened.
    #[error("could not set up logging: {0}")]
    LoggingError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The failure side of a store outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The store reported a failure, optionally with a human readable message.
    ///
    /// When `message` is `None`, observers are shown an operation specific
    /// fallback message instead.
    #[error("store failure: {}", .message.as_deref().unwrap_or("<no message>"))]
    Failure {
        /// The message supplied by the store, if any.
        message: Option<String>,
    },

    /// The store produced an outcome that was neither a clean success nor a
    /// failure.
    #[error("unexpected store outcome")]
    Unexpected,
}

impl StoreError {
    /// A failure carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: Some(message.into()),
        }
    }

    /// A failure without a message.
    pub fn without_message() -> Self {
        Self::Failure { message: None }
    }

    /// The message supplied by the store, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failure { message } => message.as_deref(),
            Self::Unexpected => None,
        }
    }
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        StoreError::failure(error.to_string())
    }
}
