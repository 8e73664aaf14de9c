//! Exploration slots (E4): a bounded share of each page drawn from the unmatched pool.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::feed::ScoredItem;
use crate::ranking::order::sort_feed;

/// Absorbs float noise so `0.1 * 30` is treated as exactly three slots.
const RATIO_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Lower bound of the exploration share of a page (default: 0.10)
    pub min_ratio: f64,
    /// Upper bound of the exploration share of a page, never above 0.15 (default: 0.15)
    pub max_ratio: f64,
    /// Sampling weight for heavily discounted or trending candidates (default: 3.0)
    pub boost_weight: f64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self { min_ratio: 0.10, max_ratio: 0.15, boost_weight: 3.0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExplorationInjector {
    config: ExplorationConfig,
    high_discount_threshold: f64,
}

impl ExplorationInjector {
    pub fn new(config: ExplorationConfig, high_discount_threshold: f64) -> Self {
        Self { config, high_discount_threshold }
    }

    /// Inclusive bounds of the exploration quota for one page, before availability.
    pub fn quota_bounds(&self, page_size: usize) -> (usize, usize) {
        let min = ratio_slots(self.config.min_ratio, page_size);
        let max = ratio_slots(self.config.max_ratio, page_size).max(min).min(page_size);
        (min.min(max), max)
    }

    /// Draws the number of exploration slots for one page given how many unmatched items remain.
    pub fn draw_quota<R: Rng>(&self, page_size: usize, available: usize, rng: &mut R) -> usize {
        if available == 0 || page_size == 0 {
            return 0;
        }
        let (min, max) = self.quota_bounds(page_size);
        let quota = if min == max { min } else { rng.gen_range(min..=max) };
        quota.min(available)
    }

    /// Removes `count` items from `pool` by weighted sampling without replacement and returns
    /// them marked as exploration, in feed order.
    ///
    /// Each candidate gets the key `u^(1/w)` for a uniform `u`; the highest keys win. One draw is
    /// made per pool entry in pool order, so the outcome depends only on the pool and the RNG.
    pub fn select<R: Rng>(
        &self,
        pool: &mut Vec<ScoredItem>,
        count: usize,
        rng: &mut R,
    ) -> Vec<ScoredItem> {
        if count == 0 || pool.is_empty() {
            return Vec::new();
        }

        let mut keyed: Vec<(usize, f64)> = pool
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                let draw: f64 = rng.gen();
                (index, draw.powf(1.0 / self.sampling_weight(candidate)))
            })
            .collect();
        keyed.sort_by(|left, right| right.1.total_cmp(&left.1).then(left.0.cmp(&right.0)));

        let chosen: Vec<usize> = keyed.iter().take(count).map(|(index, _)| *index).collect();

        let mut selected = Vec::with_capacity(chosen.len());
        let mut remaining = Vec::with_capacity(pool.len() - chosen.len());
        let mut slots: Vec<Option<ScoredItem>> = pool.drain(..).map(Some).collect();
        for index in &chosen {
            if let Some(mut candidate) = slots[*index].take() {
                candidate.mark_exploration();
                selected.push(candidate);
            }
        }
        remaining.extend(slots.into_iter().flatten());
        *pool = remaining;

        sort_feed(&mut selected);
        selected
    }

    fn sampling_weight(&self, candidate: &ScoredItem) -> f64 {
        let item = &candidate.item;
        if item.trending || item.discount() >= self.high_discount_threshold {
            self.config.boost_weight
        } else {
            1.0
        }
    }
}

/// Spreads `explorers` through `matched` at a fixed stride of `floor(matched / explorers)`.
/// Explorers that do not fit a stride position go to the end.
pub fn interleave(matched: Vec<ScoredItem>, explorers: Vec<ScoredItem>) -> Vec<ScoredItem> {
    if explorers.is_empty() {
        return matched;
    }
    if matched.is_empty() {
        return explorers;
    }

    let interval = (matched.len() / explorers.len()).max(1);
    let mut merged = Vec::with_capacity(matched.len() + explorers.len());
    let mut explorers = explorers.into_iter();
    for (position, candidate) in matched.into_iter().enumerate() {
        merged.push(candidate);
        if (position + 1) % interval == 0 {
            if let Some(explorer) = explorers.next() {
                merged.push(explorer);
            }
        }
    }
    merged.extend(explorers);
    merged
}

fn ratio_slots(ratio: f64, page_size: usize) -> usize {
    let slots = (ratio * page_size as f64 - RATIO_EPSILON).ceil();
    if slots.is_finite() && slots > 0.0 {
        slots as usize
    } else {
        0
    }
}
