//! Property package errors.

use thiserror::Error;

/// Result type for property calculations.
pub type PropsResult<T> = Result<T, PropsError>;

/// Errors raised while evaluating physical properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropsError {
    /// Non-physical values (negative temperature, empty composition, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value outside a correlation's validity range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown component '{name}'")]
    UnknownComponent { name: String },

    /// Unrecognized entry in `property_package_args`.
    #[error("Unknown property package option '{name}'")]
    UnknownOption { name: String },

    /// Iterative calculation (flash) did not converge.
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropsError::NonPhysical {
            what: "temperature",
        };
        assert!(err.to_string().contains("temperature"));

        let err = PropsError::UnknownOption {
            name: "has_holdup".into(),
        };
        assert!(err.to_string().contains("has_holdup"));
    }
}
