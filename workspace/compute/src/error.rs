use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// The training set does not hold enough distinct illness levels to learn from
    #[error("Insufficient training data: {distinct_levels} distinct illness level(s), at least 2 required")]
    InsufficientTrainingData { distinct_levels: usize },

    /// Predictor settings outside their valid range
    #[error("Invalid predictor configuration: {0}")]
    InvalidConfig(String),

    /// A feature value the model cannot order, such as NaN or infinity
    #[error("Invalid feature: {0}")]
    InvalidFeature(String),

    /// Nothing to aggregate
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// A date of birth that cannot be used to compute an age
    #[error("Invalid date of birth '{0}', expected YYYY-MM-DD")]
    InvalidDateOfBirth(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
