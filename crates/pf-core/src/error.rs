use thiserror::Error;

pub type PfResult<T> = Result<T, PfError>;

/// Errors shared by the model and configuration layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PfError {
    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Unknown configuration option '{name}'")]
    UnknownOption { name: String },

    #[error("Invalid value {value} for option '{name}' (expected {domain})")]
    DomainViolation {
        name: String,
        value: String,
        domain: String,
    },

    #[error("Option '{name}' has type {found}, expected {expected}")]
    OptionType {
        name: String,
        found: &'static str,
        expected: &'static str,
    },
}
