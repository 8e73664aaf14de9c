use crate::domain::feed::{FeedPage, PageMetadata};

/// Summarizes one page. Nothing carries over between calls.
pub fn summarize(page: &FeedPage) -> PageMetadata {
    let total = page.items.len();
    if total == 0 {
        return PageMetadata::default();
    }

    let exploration_count = page.items.iter().filter(|candidate| candidate.is_exploration).count();
    let matched_count = page
        .items
        .iter()
        .filter(|candidate| candidate.is_matched() && !candidate.is_exploration)
        .count();

    let mut expanders = Vec::new();
    for tag in page.items.iter().filter_map(|candidate| candidate.expander) {
        if !expanders.contains(&tag) {
            expanders.push(tag);
        }
    }

    let score_sum: f64 = page.items.iter().map(|candidate| candidate.score).sum();

    PageMetadata {
        total,
        matched_count,
        exploration_count,
        expanders,
        match_ratio: matched_count as f64 / total as f64,
        exploration_ratio: exploration_count as f64 / total as f64,
        average_score: score_sum / total as f64,
    }
}
