use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

/// Error types for the account store and reference dataset loaders
#[derive(Error, Debug)]
pub enum ModelError {
    /// Registration attempted with a username that is already stored
    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    /// No stored row matches the given username and password
    #[error("Invalid username or password")]
    AuthenticationFailed,

    /// Input rejected before touching the store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required column is absent from a reference table
    #[error("Missing column: {column} (in {table})")]
    MissingReferenceData { table: String, column: String },

    /// A reference table holds a value that cannot be used
    #[error("Invalid reference data in {table}: {reason}")]
    InvalidReferenceData { table: String, reason: String },

    /// The backing file does not exist
    #[error("Data file not found: {}", .0.display())]
    DataSourceNotFound(PathBuf),

    /// Error from file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),
}

impl From<polars::error::PolarsError> for ModelError {
    fn from(error: polars::error::PolarsError) -> Self {
        let model_error = match error {
            polars::error::PolarsError::ColumnNotFound(_) => {
                let err = ModelError::DataFrame(format!("Column not found: {}", error));
                error!(?err, "DataFrame error: Column not found");
                err
            }
            polars::error::PolarsError::SchemaMismatch(_) => {
                let err = ModelError::DataFrame(format!("Schema mismatch: {}", error));
                error!(?err, "DataFrame error: Schema mismatch");
                err
            }
            polars::error::PolarsError::ComputeError(_) => {
                let err = ModelError::DataFrame(format!("Compute error: {}", error));
                error!(?err, "DataFrame error: Compute error");
                err
            }
            polars::error::PolarsError::IO { .. } => {
                let err = ModelError::DataFrame(format!("I/O failure: {}", error));
                error!(?err, "DataFrame error: I/O failure");
                err
            }
            _ => {
                let err = ModelError::DataFrame(error.to_string());
                error!(?err, "DataFrame error");
                err
            }
        };
        model_error
    }
}

/// Type alias for Result with ModelError
pub type Result<T> = std::result::Result<T, ModelError>;
