//! Fallback steps that keep a page full once personal matches run out.
//!
//! E1 to E3 are decided by the scorer and E4 by the exploration injector. This module owns the
//! two steps that run on an under-filled page: backfill (E5) and price relaxation (E6). Each
//! runs only if the page is still short after the previous one.

use std::collections::VecDeque;

use tracing::trace;

use crate::domain::feed::{ExpanderTag, ScoredItem};

/// Candidates not yet placed in the full ordering, each pool already in feed order.
#[derive(Debug, Default)]
pub struct CandidatePools {
    /// Score above zero and within the price bound, if any.
    pub matched: VecDeque<ScoredItem>,
    /// Score of zero or less.
    pub unmatched: Vec<ScoredItem>,
    /// Would have matched but for the price bound; rescored without it.
    pub relaxed: VecDeque<ScoredItem>,
}

impl CandidatePools {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.unmatched.is_empty() && self.relaxed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matched.len() + self.unmatched.len() + self.relaxed.len()
    }

    pub fn take_matched(&mut self, count: usize) -> Vec<ScoredItem> {
        let count = count.min(self.matched.len());
        self.matched.drain(..count).collect()
    }
}

/// E5: tops up `window` from the unmatched pool in feed order.
pub fn backfill(window: &mut Vec<ScoredItem>, pools: &mut CandidatePools, page_size: usize) {
    let missing = page_size.saturating_sub(window.len()).min(pools.unmatched.len());
    if missing == 0 {
        return;
    }

    window.extend(pools.unmatched.drain(..missing).map(|mut candidate| {
        candidate.tag_if_untagged(ExpanderTag::E5);
        candidate
    }));
    trace!(event_name = "ranking.expander.backfill", expander = "E5", added = missing);
}

/// E6: tops up `window` with items held back only by the price bound.
pub fn relax_price(window: &mut Vec<ScoredItem>, pools: &mut CandidatePools, page_size: usize) {
    let missing = page_size.saturating_sub(window.len()).min(pools.relaxed.len());
    if missing == 0 {
        return;
    }

    window.extend(pools.relaxed.drain(..missing).map(|mut candidate| {
        candidate.tag_if_untagged(ExpanderTag::E6);
        candidate
    }));
    trace!(event_name = "ranking.expander.price_relaxed", expander = "E6", added = missing);
}
