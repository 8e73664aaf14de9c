pub mod config;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod seed;
pub mod taxonomy;

pub use config::{AppConfig, RankingConfig};
pub use domain::feed::{ExpanderTag, FeedPage, PageMetadata, PageRequest, ScoredItem};
pub use domain::item::{CandidateItem, ItemId, RawCategory};
pub use domain::profile::{SubPreferences, UserPreferenceProfile};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use ranking::{
    rank_for_profile, DeterministicFeedRanker, FeedRanker, RankedFeed, ScoringWeights,
};
pub use seed::{daily_seed, RankSeed};
pub use taxonomy::{GenreNormalizer, GenreSlug, Taxonomy};
