use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dealfeed_core::config::{resolve_config_path, weight_env_key, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct Sources {
    file_path: Option<PathBuf>,
    file_doc: Option<Value>,
}

impl Sources {
    fn describe(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

pub fn run(config_path: Option<PathBuf>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.clone(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let file_path = resolve_config_path(config_path.as_deref());
    let sources = Sources { file_doc: load_config_file_doc(file_path.as_deref()), file_path };
    let ranking = &config.ranking;

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    let mut push = |key: &str, value: String, env_keys: &[&str]| {
        lines.push(render_line(key, &value, sources.describe(key, env_keys)));
    };

    push(
        "ranking.default_page_size",
        ranking.default_page_size.to_string(),
        &["DEALFEED_RANKING_DEFAULT_PAGE_SIZE"],
    );
    push(
        "ranking.high_discount_threshold",
        ranking.high_discount_threshold.to_string(),
        &["DEALFEED_RANKING_HIGH_DISCOUNT_THRESHOLD"],
    );
    push(
        "ranking.trending_popularity_threshold",
        ranking.trending_popularity_threshold.to_string(),
        &["DEALFEED_RANKING_TRENDING_POPULARITY_THRESHOLD"],
    );
    push(
        "ranking.diversity_cap",
        ranking.diversity_cap.map_or_else(|| "<off>".to_string(), |cap| cap.to_string()),
        &["DEALFEED_RANKING_DIVERSITY_CAP"],
    );

    for (key, weight) in ranking.weights.all() {
        let env_key = weight_env_key(key);
        push(&format!("ranking.weights.{key}"), weight.to_string(), &[env_key.as_str()]);
    }

    push(
        "ranking.exploration.min_ratio",
        ranking.exploration.min_ratio.to_string(),
        &["DEALFEED_EXPLORATION_MIN_RATIO"],
    );
    push(
        "ranking.exploration.max_ratio",
        ranking.exploration.max_ratio.to_string(),
        &["DEALFEED_EXPLORATION_MAX_RATIO"],
    );
    push(
        "ranking.exploration.boost_weight",
        ranking.exploration.boost_weight.to_string(),
        &["DEALFEED_EXPLORATION_BOOST_WEIGHT"],
    );

    push(
        "taxonomy.path",
        config
            .taxonomy
            .path
            .as_ref()
            .map_or_else(|| "<built-in>".to_string(), |path| path.display().to_string()),
        &["DEALFEED_TAXONOMY_PATH"],
    );

    push(
        "logging.level",
        config.logging.level.clone(),
        &["DEALFEED_LOGGING_LEVEL", "DEALFEED_LOG_LEVEL"],
    );
    push(
        "logging.format",
        format!("{:?}", config.logging.format),
        &["DEALFEED_LOGGING_FORMAT", "DEALFEED_LOG_FORMAT"],
    );

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
