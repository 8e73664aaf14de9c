use std::path::{Path, PathBuf};

use dealfeed_core::errors::ApplicationError;
use dealfeed_core::taxonomy::GenreNormalizer;
use dealfeed_core::CandidateItem;
use serde::Serialize;

use crate::commands::{load_config, load_taxonomy, read_json, CommandResult};

#[derive(Debug, Serialize)]
struct NormalizedItem {
    id: String,
    raw: Vec<String>,
    genres: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NormalizeOutput {
    taxonomy_version: String,
    items: Vec<NormalizedItem>,
}

/// Shows which canonical genres each item's raw categories and tags resolve to.
pub fn run(items: &Path, config_path: Option<PathBuf>) -> CommandResult {
    match execute(items, config_path) {
        Ok(output) => CommandResult::data("normalize", &output),
        Err(error) => CommandResult::from_application_error("normalize", error),
    }
}

fn execute(
    items: &Path,
    config_path: Option<PathBuf>,
) -> Result<NormalizeOutput, ApplicationError> {
    let config = load_config(config_path)?;
    let taxonomy = load_taxonomy(&config)?;
    let pool: Vec<CandidateItem> = read_json(items)?;

    let normalizer = GenreNormalizer::new(&taxonomy);
    let items = pool
        .iter()
        .map(|item| NormalizedItem {
            id: item.id.as_str().to_owned(),
            raw: item.raw_labels().map(str::to_owned).collect(),
            genres: normalizer.normalize(item).iter().map(ToString::to_string).collect(),
        })
        .collect();

    Ok(NormalizeOutput { taxonomy_version: taxonomy.version().to_owned(), items })
}
