use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use dealfeed_core::errors::ApplicationError;
use dealfeed_core::ranking::{rank_for_profile, DeterministicFeedRanker};
use dealfeed_core::seed::RankSeed;
use dealfeed_core::{CandidateItem, FeedPage, PageMetadata, PageRequest, UserPreferenceProfile};
use serde::Serialize;

use crate::commands::{load_config, load_taxonomy, read_json, CommandResult};

/// Identity used for the daily seed when the caller names none.
const ANONYMOUS_IDENTITY: &str = "anonymous";

#[derive(Debug, Clone, Default)]
pub struct RankArgs {
    pub items: PathBuf,
    pub profile: Option<PathBuf>,
    pub page: i64,
    pub page_size: Option<i64>,
    pub seed: Option<u64>,
    pub date: Option<NaiveDate>,
    pub identity: Option<String>,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RankOutput {
    seed: RankSeed,
    page: FeedPage,
    metadata: PageMetadata,
}

pub fn run(args: RankArgs) -> CommandResult {
    match execute(args) {
        Ok(output) => CommandResult::data("rank", &output),
        Err(error) => CommandResult::from_application_error("rank", error),
    }
}

fn execute(args: RankArgs) -> Result<RankOutput, ApplicationError> {
    let config = load_config(args.config_path.clone())?;
    let taxonomy = load_taxonomy(&config)?;

    let items: Vec<CandidateItem> = read_json(&args.items)?;
    let profile: Option<UserPreferenceProfile> =
        args.profile.as_deref().map(read_json::<UserPreferenceProfile>).transpose()?;

    let page_size = match args.page_size {
        Some(page_size) => page_size,
        None => i64::try_from(config.ranking.default_page_size).unwrap_or(i64::MAX),
    };
    let request = PageRequest::new(args.page, page_size)?;
    let seed = resolve_seed(&args);

    let ranker = DeterministicFeedRanker::new(config.ranking, taxonomy);
    let ranked = rank_for_profile(&ranker, &items, profile.as_ref(), request, seed)?;

    Ok(RankOutput { seed, page: ranked.page, metadata: ranked.metadata })
}

/// Explicit seed wins; otherwise the daily seed for the given (or current) date and identity.
fn resolve_seed(args: &RankArgs) -> RankSeed {
    if let Some(seed) = args.seed {
        return RankSeed(seed);
    }
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let identity = args.identity.as_deref().unwrap_or(ANONYMOUS_IDENTITY);
    RankSeed::daily(date, identity)
}
