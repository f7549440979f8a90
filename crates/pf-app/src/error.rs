//! Error types for the pf-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives the CLI one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write scenario file: {path}")]
    ScenarioFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Model construction failed: {0}")]
    Model(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pf-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<pf_model::ModelError> for AppError {
    fn from(err: pf_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<pf_props::PropsError> for AppError {
    fn from(err: pf_props::PropsError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<pf_solver::SolverError> for AppError {
    fn from(err: pf_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}
