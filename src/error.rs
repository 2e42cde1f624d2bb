use compute::error::ComputeError;
use model::ModelError;
use thiserror::Error;

/// Errors surfaced by the symptom checker binary.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    /// Input typed at the menu that the current action cannot use.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The input stream ended while a prompt was waiting.
    #[error("Input closed")]
    InputClosed,

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The line printed to the console when an action fails.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Model(ModelError::DuplicateUser(_)) => "Username already exists!".to_string(),
            AppError::Model(ModelError::AuthenticationFailed) => {
                "Invalid username or password!".to_string()
            }
            AppError::Model(ModelError::MissingReferenceData { column, .. }) => {
                format!("Missing column: {}", column)
            }
            AppError::Model(ModelError::DataSourceNotFound(path)) => {
                format!("Data file not found: {}", path.display())
            }
            AppError::Model(ModelError::InvalidInput(reason)) => reason.clone(),
            AppError::Compute(ComputeError::InvalidDateOfBirth(raw)) => format!(
                "Your stored date of birth '{}' is not a valid YYYY-MM-DD date!",
                raw
            ),
            AppError::InvalidInput(reason) => reason.clone(),
            other => format!("Error: {}", other),
        }
    }

    /// Errors after which the menu loop cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::InputClosed | AppError::Io(_))
    }
}
