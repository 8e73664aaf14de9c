//! Canonical genre taxonomy and the normalization boundary in front of it.

mod builtin;
pub mod normalizer;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub use builtin::BUILTIN_VERSION;
pub use normalizer::GenreNormalizer;

/// Signal slugs emitted by the normalizer for play-mode keywords. They are not taxonomy genres
/// but the scorer treats them the same way.
pub const SIGNAL_MULTIPLAYER: &str = "multiplayer";
pub const SIGNAL_COOP: &str = "co-op";
pub const SIGNAL_SINGLEPLAYER: &str = "singleplayer";

pub const FALLBACK_LANGUAGE: &str = "en";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenreSlug(String);

impl GenreSlug {
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenreSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for GenreSlug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GenreSlug {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGenre {
    pub slug: GenreSlug,
    #[serde(default)]
    pub related: Vec<GenreSlug>,
    /// Display labels keyed by language code. The first label per language is the display
    /// label; the rest are aliases used only for matching.
    pub labels: BTreeMap<String, Vec<String>>,
}

impl CanonicalGenre {
    pub fn display_label(&self, language: &str) -> &str {
        self.labels
            .get(language)
            .or_else(|| self.labels.get(FALLBACK_LANGUAGE))
            .and_then(|labels| labels.first())
            .map(String::as_str)
            .unwrap_or_else(|| self.slug.as_str())
    }

    pub fn all_labels(&self) -> impl Iterator<Item = &str> {
        self.labels.values().flatten().map(String::as_str)
    }
}

/// One entry of the onboarding genre picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub slug: String,
    pub label: String,
    pub related: Vec<String>,
}

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("could not read taxonomy file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse taxonomy file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("taxonomy declares `{0}` more than once")]
    DuplicateSlug(String),
    #[error("genre `{genre}` lists unknown related genre `{related}`")]
    UnknownRelated { genre: String, related: String },
    #[error("taxonomy must declare at least one genre")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    version: String,
    genres: Vec<CanonicalGenre>,
}

/// Fixed, versioned set of canonical genres plus the label dictionary derived from it.
#[derive(Clone, Debug)]
pub struct Taxonomy {
    version: String,
    genres: Vec<CanonicalGenre>,
    index: HashMap<GenreSlug, usize>,
    exact_labels: HashMap<String, GenreSlug>,
    folded_labels: Vec<(String, GenreSlug)>,
}

impl Taxonomy {
    pub fn new(
        version: impl Into<String>,
        genres: Vec<CanonicalGenre>,
    ) -> Result<Self, TaxonomyError> {
        if genres.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut seen = HashSet::with_capacity(genres.len());
        for genre in &genres {
            if !seen.insert(&genre.slug) {
                return Err(TaxonomyError::DuplicateSlug(genre.slug.to_string()));
            }
        }

        for genre in &genres {
            if let Some(unknown) = genre.related.iter().find(|slug| !seen.contains(slug)) {
                return Err(TaxonomyError::UnknownRelated {
                    genre: genre.slug.to_string(),
                    related: unknown.to_string(),
                });
            }
        }

        Ok(Self::assemble(version.into(), genres))
    }

    fn assemble(version: String, genres: Vec<CanonicalGenre>) -> Self {
        let index = genres
            .iter()
            .enumerate()
            .map(|(position, genre)| (genre.slug.clone(), position))
            .collect();

        // First genre to claim a label keeps it.
        let mut exact_labels = HashMap::new();
        let mut folded_labels = Vec::new();
        for genre in &genres {
            exact_labels
                .entry(genre.slug.as_str().to_owned())
                .or_insert_with(|| genre.slug.clone());
            for label in genre.all_labels() {
                let folded = fold_label(label);
                if folded.is_empty() {
                    continue;
                }
                exact_labels.entry(folded.clone()).or_insert_with(|| genre.slug.clone());
                folded_labels.push((folded, genre.slug.clone()));
            }
        }

        Self { version, genres, index, exact_labels, folded_labels }
    }

    pub fn builtin() -> Self {
        Self::assemble(BUILTIN_VERSION.to_owned(), builtin_genres())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, TaxonomyError> {
        let file: TaxonomyFile = toml::from_str(raw)?;
        Self::new(file.version, file.genres)
    }

    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| TaxonomyError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn genres(&self) -> &[CanonicalGenre] {
        &self.genres
    }

    pub fn get(&self, slug: &GenreSlug) -> Option<&CanonicalGenre> {
        self.index.get(slug).map(|position| &self.genres[*position])
    }

    pub fn contains(&self, slug: &GenreSlug) -> bool {
        self.index.contains_key(slug)
    }

    pub fn related(&self, slug: &GenreSlug) -> &[GenreSlug] {
        self.get(slug).map(|genre| genre.related.as_slice()).unwrap_or(&[])
    }

    /// Exact lookup of an already case-folded label.
    pub(crate) fn exact(&self, folded: &str) -> Option<&GenreSlug> {
        self.exact_labels.get(folded)
    }

    /// Every localized label, case-folded, paired with its genre in taxonomy order.
    pub(crate) fn folded_labels(&self) -> &[(String, GenreSlug)] {
        &self.folded_labels
    }

    /// Genre list for onboarding UIs, in taxonomy order.
    pub fn catalog(&self, language: &str) -> Vec<CatalogEntry> {
        self.genres
            .iter()
            .map(|genre| CatalogEntry {
                slug: genre.slug.to_string(),
                label: genre.display_label(language).to_owned(),
                related: genre.related.iter().map(ToString::to_string).collect(),
            })
            .collect()
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut languages = Vec::new();
        for genre in &self.genres {
            for language in genre.labels.keys() {
                if seen.insert(language.as_str()) {
                    languages.push(language.as_str());
                }
            }
        }
        languages
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_genres() -> Vec<CanonicalGenre> {
    builtin::GENRE_SEEDS
        .iter()
        .map(|seed| CanonicalGenre {
            slug: GenreSlug::new(seed.slug),
            related: seed.related.iter().map(|slug| GenreSlug::new(slug)).collect(),
            labels: seed
                .labels
                .iter()
                .map(|(language, labels)| {
                    let labels = labels.iter().map(|label| (*label).to_owned()).collect();
                    ((*language).to_owned(), labels)
                })
                .collect(),
        })
        .collect()
}

/// Case-folds, trims and collapses inner whitespace.
pub(crate) fn fold_label(raw: &str) -> String {
    raw.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{builtin_genres, GenreSlug, Taxonomy, TaxonomyError, BUILTIN_VERSION};

    #[test]
    fn builtin_taxonomy_has_sixteen_genres_with_valid_relations() {
        assert!(Taxonomy::new(BUILTIN_VERSION, builtin_genres()).is_ok());

        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.genres().len(), 16);
        assert_eq!(taxonomy.version(), "2024.1");
        assert!(taxonomy.related(&GenreSlug::new("racing")).contains(&GenreSlug::new("sports")));
        assert!(!taxonomy.related(&GenreSlug::new("racing")).contains(&GenreSlug::new("rpg")));
        assert!(taxonomy.related(&GenreSlug::new("unknown")).is_empty());
    }

    #[test]
    fn catalog_falls_back_to_english_labels() {
        let taxonomy = Taxonomy::builtin();
        let german = taxonomy.catalog("de");
        let rpg = german.iter().find(|entry| entry.slug == "rpg").expect("rpg is listed");
        assert_eq!(rpg.label, "Rollenspiel");

        let klingon = taxonomy.catalog("tlh");
        let racing = klingon.iter().find(|entry| entry.slug == "racing").expect("racing is listed");
        assert_eq!(racing.label, "Racing");
        assert!(taxonomy.languages().contains(&"ja"));
    }

    #[test]
    fn taxonomy_file_is_validated() {
        let valid = Taxonomy::from_toml_str(
            r#"
version = "test.1"

[[genres]]
slug = "racing"
related = ["sports"]
labels = { en = ["Racing"], de = ["Rennspiel"] }

[[genres]]
slug = "Sports"
labels = { en = ["Sports"] }
"#,
        )
        .expect("taxonomy should parse");
        assert_eq!(valid.version(), "test.1");
        assert!(valid.contains(&GenreSlug::new("sports")));

        let dangling = Taxonomy::from_toml_str(
            r#"
version = "test.2"

[[genres]]
slug = "racing"
related = ["karting"]
labels = { en = ["Racing"] }
"#,
        );
        assert!(matches!(
            dangling,
            Err(TaxonomyError::UnknownRelated { ref related, .. }) if related == "karting"
        ));

        let duplicate = Taxonomy::from_toml_str(
            r#"
version = "test.3"

[[genres]]
slug = "racing"
labels = { en = ["Racing"] }

[[genres]]
slug = "RACING"
labels = { en = ["Driving"] }
"#,
        );
        assert!(matches!(duplicate, Err(TaxonomyError::DuplicateSlug(_))));
    }
}
