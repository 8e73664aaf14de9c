//! Feed re-ranking: score, partition, expand, explore, paginate, summarize.

pub mod diversity;
pub mod expander;
pub mod exploration;
pub mod metadata;
pub mod order;
pub mod scoring;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::RankingConfig;
use crate::domain::feed::{FeedPage, PageMetadata, PageRequest, ScoredItem};
use crate::domain::item::CandidateItem;
use crate::domain::profile::{SubPreferences, UserPreferenceProfile};
use crate::errors::DomainError;
use crate::seed::RankSeed;
use crate::taxonomy::Taxonomy;

use self::diversity::DiversityRebalancer;
use self::expander::CandidatePools;
use self::exploration::ExplorationInjector;
pub use self::scoring::{Relevance, RelevanceScorer, ScoringWeights};

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    direct_genre: 100.0,
    related_genre: 50.0,
    multiplayer: 20.0,
    coop: 20.0,
    singleplayer: 20.0,
    localized_text: 15.0,
    price_match: 25.0,
    trending: 10.0,
    high_discount: 15.0,
    popularity: 5.0,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedFeed {
    pub page: FeedPage,
    pub metadata: PageMetadata,
}

impl RankedFeed {
    fn empty(request: PageRequest) -> Self {
        Self { page: FeedPage::empty(request), metadata: PageMetadata::default() }
    }
}

pub trait FeedRanker: Send + Sync {
    /// Ranks `items` for `profile` and returns the requested page. The same arguments, seed
    /// included, always produce the same page.
    fn rank_feed(
        &self,
        items: &[CandidateItem],
        profile: &UserPreferenceProfile,
        request: PageRequest,
        seed: RankSeed,
    ) -> Result<RankedFeed, DomainError>;

    /// Ranking for users without stated genres: genre signals are ignored and every item on the
    /// page is presented as exploration.
    fn rank_without_preferences(
        &self,
        items: &[CandidateItem],
        request: PageRequest,
        seed: RankSeed,
    ) -> Result<RankedFeed, DomainError>;
}

/// Routes a missing profile, or one without declared genres, to
/// [`FeedRanker::rank_without_preferences`]. Sub-preferences alone do not personalize the feed.
pub fn rank_for_profile<R: FeedRanker + ?Sized>(
    ranker: &R,
    items: &[CandidateItem],
    profile: Option<&UserPreferenceProfile>,
    request: PageRequest,
    seed: RankSeed,
) -> Result<RankedFeed, DomainError> {
    match profile {
        Some(profile) if profile.has_genres() => ranker.rank_feed(items, profile, request, seed),
        _ => ranker.rank_without_preferences(items, request, seed),
    }
}

#[derive(Clone, Debug)]
pub struct DeterministicFeedRanker {
    config: RankingConfig,
    taxonomy: Taxonomy,
}

impl Default for DeterministicFeedRanker {
    fn default() -> Self {
        Self::new(RankingConfig::default(), Taxonomy::builtin())
    }
}

impl DeterministicFeedRanker {
    pub fn new(config: RankingConfig, taxonomy: Taxonomy) -> Self {
        Self { config, taxonomy }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    fn rank(
        &self,
        items: &[CandidateItem],
        profile: &UserPreferenceProfile,
        weights: ScoringWeights,
        request: PageRequest,
        seed: RankSeed,
        explore_whole_page: bool,
    ) -> Result<RankedFeed, DomainError> {
        if items.is_empty() {
            return Ok(RankedFeed::empty(request));
        }

        let ordered = self.order_all(items, profile, weights, request.page_size(), seed)?;
        let mut page = order::paginate(ordered, request);
        if explore_whole_page {
            page.items.iter_mut().for_each(ScoredItem::mark_exploration);
        }
        let metadata = metadata::summarize(&page);

        debug!(
            event_name = "ranking.feed.ranked",
            pool_size = items.len(),
            page = request.page(),
            page_size = request.page_size(),
            returned = metadata.total,
            matched = metadata.matched_count,
            exploration = metadata.exploration_count,
            expanders = ?metadata.expanders,
            seed = seed.value(),
            "feed ranked"
        );

        Ok(RankedFeed { page, metadata })
    }

    /// Produces the complete ordering of the pool, page window by page window.
    fn order_all(
        &self,
        items: &[CandidateItem],
        profile: &UserPreferenceProfile,
        weights: ScoringWeights,
        page_size: usize,
        seed: RankSeed,
    ) -> Result<Vec<ScoredItem>, DomainError> {
        let mut pools = self.partition(items, profile, weights);
        let injector =
            ExplorationInjector::new(self.config.exploration, self.config.high_discount_threshold);
        let mut rng = seed.rng();
        let mut ordered = Vec::with_capacity(items.len());

        while !pools.is_empty() {
            let quota = injector.draw_quota(page_size, pools.unmatched.len(), &mut rng);
            let explorers = injector.select(&mut pools.unmatched, quota, &mut rng);
            if !explorers.is_empty() {
                trace!(
                    event_name = "ranking.expander.exploration",
                    expander = "E4",
                    added = explorers.len()
                );
            }

            let matched = pools.take_matched(page_size.saturating_sub(explorers.len()));
            let mut window = exploration::interleave(matched, explorers);
            expander::backfill(&mut window, &mut pools, page_size);
            expander::relax_price(&mut window, &mut pools, page_size);
            ordered.extend(window);
        }

        if let Some(cap) = self.config.diversity_cap {
            ordered = DiversityRebalancer::new(&self.taxonomy, cap).rebalance(ordered, page_size);
        }

        if ordered.len() != items.len() {
            return Err(DomainError::InvariantViolation(format!(
                "ordering holds {} items for a pool of {}",
                ordered.len(),
                items.len()
            )));
        }

        Ok(ordered)
    }

    /// Scores every item and sorts it into the matched, unmatched and price-held pools.
    fn partition(
        &self,
        items: &[CandidateItem],
        profile: &UserPreferenceProfile,
        weights: ScoringWeights,
    ) -> CandidatePools {
        let scorer = RelevanceScorer::new(&self.taxonomy, &self.config).with_weights(weights);
        let normalizer = scorer.normalizer();
        let max_price = profile.sub_preferences.max_price;

        let mut matched = Vec::new();
        let mut unmatched = Vec::new();
        let mut price_held = Vec::new();
        for item in items {
            let genres = normalizer.normalize(item);
            let Relevance { score, matched: labels, expander } =
                scorer.score_normalized(item, &genres, profile);
            let candidate = ScoredItem {
                item: item.clone(),
                genres,
                score,
                matched: labels,
                expander,
                is_exploration: false,
            };

            let over_budget =
                matches!((max_price, item.price), (Some(max), Some(price)) if price > max);
            if !candidate.is_matched() {
                unmatched.push(candidate);
            } else if over_budget {
                price_held.push(candidate);
            } else {
                matched.push(candidate);
            }
        }

        if !price_held.is_empty() {
            let sub_preferences =
                SubPreferences { max_price: None, ..profile.sub_preferences.clone() };
            let relaxed_profile = UserPreferenceProfile { sub_preferences, ..profile.clone() };
            for candidate in &mut price_held {
                let relevance =
                    scorer.score_normalized(&candidate.item, &candidate.genres, &relaxed_profile);
                candidate.score = relevance.score;
                candidate.matched = relevance.matched;
                candidate.expander = relevance.expander;
            }
        }

        order::sort_feed(&mut matched);
        order::sort_feed(&mut unmatched);
        order::sort_feed(&mut price_held);

        CandidatePools { matched: matched.into(), unmatched, relaxed: price_held.into() }
    }
}

impl FeedRanker for DeterministicFeedRanker {
    fn rank_feed(
        &self,
        items: &[CandidateItem],
        profile: &UserPreferenceProfile,
        request: PageRequest,
        seed: RankSeed,
    ) -> Result<RankedFeed, DomainError> {
        self.rank(items, profile, self.config.weights, request, seed, false)
    }

    fn rank_without_preferences(
        &self,
        items: &[CandidateItem],
        request: PageRequest,
        seed: RankSeed,
    ) -> Result<RankedFeed, DomainError> {
        let weights = self.config.weights.without_genre_signals();
        self.rank(items, &UserPreferenceProfile::default(), weights, request, seed, true)
    }
}
