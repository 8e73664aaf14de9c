use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("page size must be greater than zero, got {0}")]
    InvalidPageSize(i64),
    #[error("page must not be negative, got {0}")]
    InvalidPage(i64),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    /// Caller mistakes, as opposed to bugs in the engine.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidPageSize(_) | Self::InvalidPage(_))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("input failure: {0}")]
    Input(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("taxonomy failure: {0}")]
    Taxonomy(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(error) if error.is_caller_error() => {
                Self::BadRequest { message: error.to_string(), correlation_id }
            }
            ApplicationError::Domain(error) => {
                Self::Internal { message: error.to_string(), correlation_id }
            }
            ApplicationError::Input(message) => Self::BadRequest { message, correlation_id },
            ApplicationError::Configuration(message) | ApplicationError::Taxonomy(message) => {
                Self::Internal { message, correlation_id }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn page_errors_map_to_bad_request_interface_error() {
        let interface =
            ApplicationError::from(DomainError::InvalidPageSize(0)).into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ref message,
            } if correlation_id == "req-1" && message.contains("page size")
        ));
    }

    #[test]
    fn bad_request_has_user_safe_message() {
        let interface = ApplicationError::Input("items file is not valid JSON".to_owned())
            .into_interface("req-2");

        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn invariant_violation_maps_to_internal() {
        let interface = ApplicationError::from(DomainError::InvariantViolation(
            "ordering lost an item".to_owned(),
        ))
        .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert!(!DomainError::InvariantViolation(String::new()).is_caller_error());
    }

    #[test]
    fn configuration_and_taxonomy_errors_map_to_internal() {
        let configuration = ApplicationError::Configuration("invalid exploration ratio".to_owned())
            .into_interface("req-4");
        assert!(matches!(configuration, InterfaceError::Internal { .. }));
        assert_eq!(configuration.user_message(), "An unexpected internal error occurred.");

        let taxonomy =
            ApplicationError::Taxonomy("duplicate slug".to_owned()).into_interface("req-5");
        assert!(matches!(taxonomy, InterfaceError::Internal { .. }));
    }
}
