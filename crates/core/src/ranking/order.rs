use std::cmp::Ordering;

use crate::domain::feed::{FeedPage, PageRequest, ScoredItem};

/// Feed order: score, then discount, then popularity, all descending.
///
/// Equal keys compare equal so a stable sort keeps input order as the last tie-break.
pub fn feed_order(left: &ScoredItem, right: &ScoredItem) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| right.item.discount().total_cmp(&left.item.discount()))
        .then_with(|| right.item.popularity_score().total_cmp(&left.item.popularity_score()))
}

pub fn sort_feed(items: &mut [ScoredItem]) {
    items.sort_by(feed_order);
}

/// Cuts the requested page out of the full ordering. Pages past the end come back empty.
pub fn paginate(ordered: Vec<ScoredItem>, request: PageRequest) -> FeedPage {
    let items = ordered.into_iter().skip(request.offset()).take(request.page_size()).collect();
    FeedPage { items, page: request.page(), page_size: request.page_size() }
}
