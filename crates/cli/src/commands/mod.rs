pub mod config;
pub mod normalize;
pub mod rank;
pub mod taxonomy;

use std::fs;
use std::path::{Path, PathBuf};

use dealfeed_core::config::{AppConfig, LoadOptions};
use dealfeed_core::errors::ApplicationError;
use dealfeed_core::taxonomy::Taxonomy;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;
pub const EXIT_DOMAIN: u8 = 4;
pub const EXIT_INTERNAL: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    correlation_id: Option<String>,
}

impl CommandResult {
    /// Successful run whose output is the serialized `payload`.
    pub fn data(command: &str, payload: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(
                command,
                "serialization",
                format!("could not serialize output: {error}"),
                EXIT_INTERNAL,
            ),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            correlation_id: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Failure reported through the interface error mapping, tagged with a fresh correlation id.
    pub fn from_application_error(command: &str, error: ApplicationError) -> Self {
        let (error_class, exit_code) = match &error {
            ApplicationError::Configuration(_) => ("config_validation", EXIT_CONFIG),
            ApplicationError::Taxonomy(_) => ("taxonomy", EXIT_CONFIG),
            ApplicationError::Input(_) => ("input", EXIT_INPUT),
            ApplicationError::Domain(domain) if domain.is_caller_error() => ("domain", EXIT_DOMAIN),
            ApplicationError::Domain(_) => ("internal", EXIT_INTERNAL),
        };
        let detail = error.to_string();
        let interface = error.into_interface(uuid::Uuid::new_v4().to_string());

        tracing::warn!(
            event_name = "cli.command.failed",
            command,
            error_class,
            correlation_id = interface.correlation_id(),
            "{detail}"
        );

        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: format!("{}: {detail}", interface.user_message()),
            correlation_id: Some(interface.correlation_id().to_string()),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\
             \"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, ApplicationError> {
    AppConfig::load(LoadOptions { config_path, ..LoadOptions::default() })
        .map_err(|error| ApplicationError::Configuration(error.to_string()))
}

pub(crate) fn load_taxonomy(config: &AppConfig) -> Result<Taxonomy, ApplicationError> {
    config.taxonomy.load().map_err(|error| ApplicationError::Taxonomy(error.to_string()))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ApplicationError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        ApplicationError::Input(format!("could not read `{}`: {error}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        ApplicationError::Input(format!("`{}` is not valid JSON input: {error}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use dealfeed_core::errors::{ApplicationError, DomainError};
    use serde_json::Value;

    use super::{CommandResult, EXIT_DOMAIN, EXIT_INTERNAL};

    fn payload(result: &CommandResult) -> Value {
        serde_json::from_str(&result.output).expect("outcome should be valid JSON")
    }

    #[test]
    fn unserializable_output_is_an_internal_failure() {
        let unkeyable: BTreeMap<Vec<u8>, u8> = BTreeMap::from([(vec![1, 2], 3)]);
        let result = CommandResult::data("rank", &unkeyable);

        assert_eq!(result.exit_code, EXIT_INTERNAL);
        assert_eq!(payload(&result)["error_class"], "serialization");
    }

    #[test]
    fn invariant_violation_is_not_reported_as_caller_error() {
        let broken = ApplicationError::Domain(DomainError::InvariantViolation(
            "ordering lost items".to_string(),
        ));
        let result = CommandResult::from_application_error("rank", broken);
        assert_eq!(result.exit_code, EXIT_INTERNAL);
        assert_eq!(payload(&result)["error_class"], "internal");

        let caller = ApplicationError::Domain(DomainError::InvalidPageSize(0));
        let result = CommandResult::from_application_error("rank", caller);
        assert_eq!(result.exit_code, EXIT_DOMAIN);
        assert_eq!(payload(&result)["error_class"], "domain");
    }
}
