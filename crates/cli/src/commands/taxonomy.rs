use std::path::PathBuf;

use dealfeed_core::errors::ApplicationError;
use dealfeed_core::taxonomy::{CatalogEntry, FALLBACK_LANGUAGE};
use serde::Serialize;

use crate::commands::{load_config, load_taxonomy, CommandResult};

#[derive(Debug, Serialize)]
struct TaxonomyOutput {
    version: String,
    language: String,
    languages: Vec<String>,
    genres: Vec<CatalogEntry>,
}

/// Lists the canonical genres for an onboarding picker in `language`.
pub fn run(language: Option<String>, config_path: Option<PathBuf>) -> CommandResult {
    match execute(language, config_path) {
        Ok(output) => CommandResult::data("taxonomy", &output),
        Err(error) => CommandResult::from_application_error("taxonomy", error),
    }
}

fn execute(
    language: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<TaxonomyOutput, ApplicationError> {
    let config = load_config(config_path)?;
    let taxonomy = load_taxonomy(&config)?;

    let language = language
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_owned());

    Ok(TaxonomyOutput {
        version: taxonomy.version().to_owned(),
        languages: taxonomy.languages().into_iter().map(str::to_owned).collect(),
        genres: taxonomy.catalog(&language),
        language,
    })
}
