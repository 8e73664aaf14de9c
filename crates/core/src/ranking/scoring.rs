//! Relevance scoring for candidate items against a preference profile.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::RankingConfig;
use crate::domain::feed::ExpanderTag;
use crate::domain::item::CandidateItem;
use crate::domain::profile::UserPreferenceProfile;
use crate::taxonomy::{
    GenreNormalizer, GenreSlug, Taxonomy, SIGNAL_COOP, SIGNAL_MULTIPLAYER, SIGNAL_SINGLEPLAYER,
};

pub const LABEL_RELATED_PREFIX: &str = "related:";
pub const LABEL_LOCALIZED_TEXT: &str = "localized-text";
pub const LABEL_PRICE_MATCH: &str = "price:match";

/// Weights for scoring components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Per profile genre found on the item (default: 100)
    pub direct_genre: f64,
    /// Per related genre found on the item when nothing matched directly (default: 50)
    pub related_genre: f64,
    pub multiplayer: f64,
    pub coop: f64,
    pub singleplayer: f64,
    pub localized_text: f64,
    /// Item price within the profile's max price (default: 25)
    pub price_match: f64,
    pub trending: f64,
    pub high_discount: f64,
    /// Scaled by popularity / 100 (default: 5)
    pub popularity: f64,
}

impl ScoringWeights {
    /// Same weights with both genre signals zeroed, for ranking without stated preferences.
    pub fn without_genre_signals(self) -> Self {
        Self { direct_genre: 0.0, related_genre: 0.0, ..self }
    }

    /// Every weight keyed by its config name.
    pub fn all(&self) -> [(&'static str, f64); 10] {
        [
            ("direct_genre", self.direct_genre),
            ("related_genre", self.related_genre),
            ("multiplayer", self.multiplayer),
            ("coop", self.coop),
            ("singleplayer", self.singleplayer),
            ("localized_text", self.localized_text),
            ("price_match", self.price_match),
            ("trending", self.trending),
            ("high_discount", self.high_discount),
            ("popularity", self.popularity),
        ]
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Outcome of scoring one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Relevance {
    pub score: f64,
    pub matched: Vec<String>,
    pub expander: Option<ExpanderTag>,
}

#[derive(Debug, Clone, Copy)]
pub struct RelevanceScorer<'t> {
    normalizer: GenreNormalizer<'t>,
    taxonomy: &'t Taxonomy,
    weights: ScoringWeights,
    high_discount_threshold: f64,
    trending_popularity_threshold: f64,
}

impl<'t> RelevanceScorer<'t> {
    pub fn new(taxonomy: &'t Taxonomy, config: &RankingConfig) -> Self {
        Self {
            normalizer: GenreNormalizer::new(taxonomy),
            taxonomy,
            weights: config.weights,
            high_discount_threshold: config.high_discount_threshold,
            trending_popularity_threshold: config.trending_popularity_threshold,
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn normalizer(&self) -> GenreNormalizer<'t> {
        self.normalizer
    }

    pub fn score(&self, item: &CandidateItem, profile: &UserPreferenceProfile) -> Relevance {
        let genres = self.normalizer.normalize(item);
        self.score_normalized(item, &genres, profile)
    }

    /// Scores an item whose raw categories were already normalized into `genres`.
    pub fn score_normalized(
        &self,
        item: &CandidateItem,
        genres: &BTreeSet<GenreSlug>,
        profile: &UserPreferenceProfile,
    ) -> Relevance {
        let weights = &self.weights;
        let mut score = 0.0;
        let mut matched = Vec::new();
        let mut expander = None;

        let direct: Vec<&GenreSlug> = profile.genres.intersection(genres).collect();
        if !direct.is_empty() {
            score += weights.direct_genre * direct.len() as f64;
            matched.extend(direct.iter().map(ToString::to_string));
        } else {
            let related: BTreeSet<&GenreSlug> = profile
                .genres
                .iter()
                .flat_map(|slug| self.taxonomy.related(slug))
                .filter(|slug| genres.contains(*slug))
                .collect();
            if !related.is_empty() {
                score += weights.related_genre * related.len() as f64;
                matched.extend(related.iter().map(|slug| format!("{LABEL_RELATED_PREFIX}{slug}")));
                expander = Some(ExpanderTag::E1);
            }
        }

        let prefs = &profile.sub_preferences;
        let play_modes = [
            (prefs.multiplayer, SIGNAL_MULTIPLAYER, weights.multiplayer),
            (prefs.coop, SIGNAL_COOP, weights.coop),
            (prefs.singleplayer, SIGNAL_SINGLEPLAYER, weights.singleplayer),
        ];
        for (wanted, signal, weight) in play_modes {
            if wanted && genres.contains(&GenreSlug::new(signal)) {
                score += weight;
                matched.push(signal.to_owned());
            }
        }

        if prefs.localized_text && item.localized_text {
            score += weights.localized_text;
            matched.push(LABEL_LOCALIZED_TEXT.to_owned());
        }

        // Unknown price earns nothing but is not treated as over budget either.
        if let (Some(max_price), Some(price)) = (prefs.max_price, item.price) {
            if price <= max_price {
                score += weights.price_match;
                matched.push(LABEL_PRICE_MATCH.to_owned());
            }
        }

        let popularity = item.popularity_score();
        if item.trending || popularity > self.trending_popularity_threshold {
            score += weights.trending;
            expander.get_or_insert(ExpanderTag::E2);
        }

        if item.discount() >= self.high_discount_threshold {
            score += weights.high_discount;
            expander.get_or_insert(ExpanderTag::E3);
        }

        score += weights.popularity * popularity / 100.0;

        Relevance { score: if score.is_finite() { score } else { 0.0 }, matched, expander }
    }
}
