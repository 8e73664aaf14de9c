use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ranking::exploration::ExplorationConfig;
use crate::ranking::ScoringWeights;
use crate::taxonomy::{Taxonomy, TaxonomyError};

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["dealfeed.toml", "config/dealfeed.toml"];

/// Exploration may never take more than this share of a page.
pub const EXPLORATION_HARD_CAP: f64 = 0.15;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub ranking: RankingConfig,
    pub taxonomy: TaxonomyConfig,
    pub logging: LoggingConfig,
}

/// Every tunable the ranking engine reads. Passed explicitly; the engine has no globals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub default_page_size: usize,
    /// Discount percent at or above which an item earns the high-discount bonus (E3)
    pub high_discount_threshold: f64,
    /// Popularity above which an item counts as trending (E2)
    pub trending_popularity_threshold: f64,
    /// Optional per-genre share cap for each page window; unset disables rebalancing
    pub diversity_cap: Option<f64>,
    pub weights: ScoringWeights,
    pub exploration: ExplorationConfig,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            high_discount_threshold: 30.0,
            trending_popularity_threshold: 80.0,
            diversity_cap: None,
            weights: ScoringWeights::default(),
            exploration: ExplorationConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaxonomyConfig {
    /// Replacement taxonomy file; the built-in taxonomy is used when unset.
    pub path: Option<PathBuf>,
}

impl TaxonomyConfig {
    pub fn load(&self) -> Result<Taxonomy, TaxonomyError> {
        match &self.path {
            Some(path) => Taxonomy::load(path),
            None => Ok(Taxonomy::builtin()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub default_page_size: Option<usize>,
    pub diversity_cap: Option<f64>,
    pub taxonomy_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

/// Config keys under `[ranking.weights]`, in declaration order.
pub const WEIGHT_KEYS: [&str; 10] = [
    "direct_genre",
    "related_genre",
    "multiplayer",
    "coop",
    "singleplayer",
    "localized_text",
    "price_match",
    "trending",
    "high_discount",
    "popularity",
];

/// Environment variable that overrides the weight stored under `key`.
pub fn weight_env_key(key: &str) -> String {
    format!("DEALFEED_WEIGHTS_{}", key.to_ascii_uppercase())
}

fn weight_slot<'a>(weights: &'a mut ScoringWeights, key: &str) -> Option<&'a mut f64> {
    let slot = match key {
        "direct_genre" => &mut weights.direct_genre,
        "related_genre" => &mut weights.related_genre,
        "multiplayer" => &mut weights.multiplayer,
        "coop" => &mut weights.coop,
        "singleplayer" => &mut weights.singleplayer,
        "localized_text" => &mut weights.localized_text,
        "price_match" => &mut weights.price_match,
        "trending" => &mut weights.trending,
        "high_discount" => &mut weights.high_discount,
        "popularity" => &mut weights.popularity,
        _ => return None,
    };
    Some(slot)
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(ranking) = patch.ranking {
            let target = &mut self.ranking;
            set(&mut target.default_page_size, ranking.default_page_size);
            set(&mut target.high_discount_threshold, ranking.high_discount_threshold);
            set(&mut target.trending_popularity_threshold, ranking.trending_popularity_threshold);
            if let Some(cap) = ranking.diversity_cap {
                target.diversity_cap = Some(cap);
            }

            if let Some(weights) = ranking.weights {
                let w = &mut target.weights;
                set(&mut w.direct_genre, weights.direct_genre);
                set(&mut w.related_genre, weights.related_genre);
                set(&mut w.multiplayer, weights.multiplayer);
                set(&mut w.coop, weights.coop);
                set(&mut w.singleplayer, weights.singleplayer);
                set(&mut w.localized_text, weights.localized_text);
                set(&mut w.price_match, weights.price_match);
                set(&mut w.trending, weights.trending);
                set(&mut w.high_discount, weights.high_discount);
                set(&mut w.popularity, weights.popularity);
            }

            if let Some(exploration) = ranking.exploration {
                let e = &mut target.exploration;
                set(&mut e.min_ratio, exploration.min_ratio);
                set(&mut e.max_ratio, exploration.max_ratio);
                set(&mut e.boost_weight, exploration.boost_weight);
            }
        }

        if let Some(taxonomy) = patch.taxonomy {
            if let Some(path) = taxonomy.path {
                self.taxonomy.path = Some(path);
            }
        }

        if let Some(logging) = patch.logging {
            set(&mut self.logging.level, logging.level);
            set(&mut self.logging.format, logging.format);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DEALFEED_RANKING_DEFAULT_PAGE_SIZE") {
            self.ranking.default_page_size =
                parse_env("DEALFEED_RANKING_DEFAULT_PAGE_SIZE", &value)?;
        }
        if let Some(value) = read_env("DEALFEED_RANKING_HIGH_DISCOUNT_THRESHOLD") {
            self.ranking.high_discount_threshold =
                parse_env("DEALFEED_RANKING_HIGH_DISCOUNT_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("DEALFEED_RANKING_TRENDING_POPULARITY_THRESHOLD") {
            self.ranking.trending_popularity_threshold =
                parse_env("DEALFEED_RANKING_TRENDING_POPULARITY_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("DEALFEED_RANKING_DIVERSITY_CAP") {
            self.ranking.diversity_cap = Some(parse_env("DEALFEED_RANKING_DIVERSITY_CAP", &value)?);
        }

        for key in WEIGHT_KEYS {
            let env_key = weight_env_key(key);
            if let Some(value) = read_env(&env_key) {
                let parsed = parse_env(&env_key, &value)?;
                if let Some(slot) = weight_slot(&mut self.ranking.weights, key) {
                    *slot = parsed;
                }
            }
        }

        if let Some(value) = read_env("DEALFEED_EXPLORATION_MIN_RATIO") {
            self.ranking.exploration.min_ratio =
                parse_env("DEALFEED_EXPLORATION_MIN_RATIO", &value)?;
        }
        if let Some(value) = read_env("DEALFEED_EXPLORATION_MAX_RATIO") {
            self.ranking.exploration.max_ratio =
                parse_env("DEALFEED_EXPLORATION_MAX_RATIO", &value)?;
        }
        if let Some(value) = read_env("DEALFEED_EXPLORATION_BOOST_WEIGHT") {
            self.ranking.exploration.boost_weight =
                parse_env("DEALFEED_EXPLORATION_BOOST_WEIGHT", &value)?;
        }

        if let Some(value) = read_env("DEALFEED_TAXONOMY_PATH") {
            self.taxonomy.path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("DEALFEED_LOGGING_LEVEL").or_else(|| read_env("DEALFEED_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("DEALFEED_LOGGING_FORMAT").or_else(|| read_env("DEALFEED_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        set(&mut self.ranking.default_page_size, overrides.default_page_size);
        if let Some(cap) = overrides.diversity_cap {
            self.ranking.diversity_cap = Some(cap);
        }
        if let Some(path) = overrides.taxonomy_path {
            self.taxonomy.path = Some(path);
        }
        set(&mut self.logging.level, overrides.log_level);
        set(&mut self.logging.format, overrides.log_format);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ranking(&self.ranking)?;
        validate_taxonomy(&self.taxonomy)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_ranking(ranking: &RankingConfig) -> Result<(), ConfigError> {
    if ranking.default_page_size == 0 {
        return Err(ConfigError::Validation(
            "ranking.default_page_size must be greater than zero".to_string(),
        ));
    }

    let threshold = ranking.high_discount_threshold;
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 100.0 {
        return Err(ConfigError::Validation(
            "ranking.high_discount_threshold must be a percentage in range (0, 100]".to_string(),
        ));
    }

    let trending = ranking.trending_popularity_threshold;
    if !trending.is_finite() || !(0.0..=100.0).contains(&trending) {
        return Err(ConfigError::Validation(
            "ranking.trending_popularity_threshold must be in range 0..=100".to_string(),
        ));
    }

    for (key, weight) in ranking.weights.all() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::Validation(format!(
                "ranking.weights.{key} must be a finite, non-negative number (got {weight})"
            )));
        }
    }

    let exploration = &ranking.exploration;
    let ratios_valid = exploration.min_ratio > 0.0
        && exploration.min_ratio <= exploration.max_ratio
        && exploration.max_ratio <= EXPLORATION_HARD_CAP;
    if !ratios_valid {
        return Err(ConfigError::Validation(format!(
            "ranking.exploration ratios must satisfy 0 < min_ratio <= max_ratio <= \
             {EXPLORATION_HARD_CAP} (got min_ratio={}, max_ratio={})",
            exploration.min_ratio, exploration.max_ratio
        )));
    }

    if !exploration.boost_weight.is_finite() || exploration.boost_weight < 1.0 {
        return Err(ConfigError::Validation(
            "ranking.exploration.boost_weight must be at least 1.0".to_string(),
        ));
    }

    if let Some(cap) = ranking.diversity_cap {
        if !cap.is_finite() || cap <= 0.0 || cap > 1.0 {
            return Err(ConfigError::Validation(
                "ranking.diversity_cap must be in range (0, 1]; remove it to disable the cap"
                    .to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_taxonomy(taxonomy: &TaxonomyConfig) -> Result<(), ConfigError> {
    if let Some(path) = &taxonomy.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "taxonomy.path must not be empty; remove it to use the built-in taxonomy"
                    .to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    ranking: Option<RankingPatch>,
    taxonomy: Option<TaxonomyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingPatch {
    default_page_size: Option<usize>,
    high_discount_threshold: Option<f64>,
    trending_popularity_threshold: Option<f64>,
    diversity_cap: Option<f64>,
    weights: Option<WeightsPatch>,
    exploration: Option<ExplorationPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WeightsPatch {
    direct_genre: Option<f64>,
    related_genre: Option<f64>,
    multiplayer: Option<f64>,
    coop: Option<f64>,
    singleplayer: Option<f64>,
    localized_text: Option<f64>,
    price_match: Option<f64>,
    trending: Option<f64>,
    high_discount: Option<f64>,
    popularity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ExplorationPatch {
    min_ratio: Option<f64>,
    max_ratio: Option<f64>,
    boost_weight: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TaxonomyPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
