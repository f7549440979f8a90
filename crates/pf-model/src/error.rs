//! Model construction and evaluation errors.

use pf_core::PfError;
use pf_props::PropsError;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Unit configuration rejected at construction.
    #[error("{message}")]
    Configuration { message: String },

    #[error("Duplicate name '{name}'")]
    DuplicateName { name: String },

    #[error("Unknown name '{name}'")]
    UnknownName { name: String },

    #[error("Unknown property package '{name}'")]
    UnknownPackage { name: String },

    /// Construction step called out of order or with inconsistent inputs.
    #[error("Invalid model construction: {what}")]
    Construction { what: &'static str },

    /// Two ports cannot be connected.
    #[error("Port mismatch between '{source_port}' and '{destination}': {what}")]
    PortMismatch {
        source_port: String,
        destination: String,
        what: &'static str,
    },

    #[error("Property evaluation failed: {0}")]
    Props(#[from] PropsError),

    #[error(transparent)]
    Core(#[from] PfError),
}

impl ModelError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        ModelError::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_message_is_verbatim() {
        let err = ModelError::configuration("Heater unit model does not support holdup");
        assert_eq!(err.to_string(), "Heater unit model does not support holdup");
    }

    #[test]
    fn props_error_converts() {
        let err: ModelError = PropsError::NonPhysical {
            what: "temperature",
        }
        .into();
        assert!(matches!(err, ModelError::Props(_)));
    }
}
