//! Optional per-genre cap applied to each page window of the full ordering.

use std::collections::{HashMap, VecDeque};

use crate::domain::feed::ScoredItem;
use crate::taxonomy::{GenreSlug, Taxonomy};

#[derive(Debug, Clone, Copy)]
pub struct DiversityRebalancer<'t> {
    taxonomy: &'t Taxonomy,
    cap_ratio: f64,
}

impl<'t> DiversityRebalancer<'t> {
    pub fn new(taxonomy: &'t Taxonomy, cap_ratio: f64) -> Self {
        Self { taxonomy, cap_ratio }
    }

    /// Most items sharing one primary genre that a page of `page_size` may hold.
    pub fn per_genre_limit(&self, page_size: usize) -> usize {
        let limit = (self.cap_ratio * page_size as f64).floor();
        if limit.is_finite() && limit >= 1.0 {
            limit as usize
        } else {
            1
        }
    }

    /// Defers items past the cap into the next window. When a window cannot be filled any other
    /// way, deferred items fill it anyway; the output is always a permutation of the input.
    pub fn rebalance(&self, ordered: Vec<ScoredItem>, page_size: usize) -> Vec<ScoredItem> {
        if page_size == 0 || ordered.len() <= 1 {
            return ordered;
        }

        let limit = self.per_genre_limit(page_size);
        let mut pending: VecDeque<ScoredItem> = ordered.into();
        let mut balanced = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let mut window = Vec::with_capacity(page_size);
            let mut deferred = Vec::new();
            let mut per_genre: HashMap<GenreSlug, usize> = HashMap::new();

            while window.len() < page_size {
                let Some(candidate) = pending.pop_front() else {
                    break;
                };
                match self.primary_genre(&candidate) {
                    Some(genre) => {
                        let placed = per_genre.entry(genre).or_insert(0);
                        if *placed >= limit {
                            deferred.push(candidate);
                        } else {
                            *placed += 1;
                            window.push(candidate);
                        }
                    }
                    None => window.push(candidate),
                }
            }

            let shortfall = page_size.saturating_sub(window.len()).min(deferred.len());
            window.extend(deferred.drain(..shortfall));
            balanced.extend(window);

            for candidate in deferred.into_iter().rev() {
                pending.push_front(candidate);
            }
        }

        balanced
    }

    /// First canonical taxonomy slug on the item; play-mode signals do not count.
    fn primary_genre(&self, candidate: &ScoredItem) -> Option<GenreSlug> {
        candidate.genres.iter().find(|slug| self.taxonomy.contains(slug)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::DiversityRebalancer;
    use crate::domain::feed::ScoredItem;
    use crate::domain::item::CandidateItem;
    use crate::taxonomy::{GenreSlug, Taxonomy};

    fn scored(id: &str, genres: &[&str]) -> ScoredItem {
        ScoredItem {
            item: CandidateItem::new(id),
            genres: genres.iter().map(|slug| GenreSlug::new(slug)).collect::<BTreeSet<_>>(),
            score: 1.0,
            matched: Vec::new(),
            expander: None,
            is_exploration: false,
        }
    }

    fn ids(items: &[ScoredItem]) -> Vec<&str> {
        items.iter().map(|candidate| candidate.item.id.as_str()).collect()
    }

    #[test]
    fn overflow_is_deferred_to_next_window() {
        let taxonomy = Taxonomy::builtin();
        let rebalancer = DiversityRebalancer::new(&taxonomy, 0.5);
        let ordered = vec![
            scored("r1", &["racing"]),
            scored("r2", &["racing"]),
            scored("r3", &["racing"]),
            scored("p1", &["puzzle"]),
            scored("s1", &["sports"]),
            scored("n1", &[]),
        ];

        let balanced = rebalancer.rebalance(ordered, 4);
        assert_eq!(ids(&balanced), vec!["r1", "r2", "p1", "s1", "r3", "n1"]);
    }

    #[test]
    fn cap_never_drops_items() {
        let taxonomy = Taxonomy::builtin();
        let rebalancer = DiversityRebalancer::new(&taxonomy, 0.25);
        let ordered: Vec<ScoredItem> =
            (0..7).map(|n| scored(&format!("r{n}"), &["racing", "multiplayer"])).collect();

        let balanced = rebalancer.rebalance(ordered, 4);
        assert_eq!(ids(&balanced), vec!["r0", "r1", "r2", "r3", "r4", "r5", "r6"]);
    }

    #[test]
    fn signal_slugs_are_not_capped() {
        let taxonomy = Taxonomy::builtin();
        let rebalancer = DiversityRebalancer::new(&taxonomy, 0.1);
        assert_eq!(rebalancer.per_genre_limit(4), 1);

        let ordered = vec![
            scored("a", &["co-op"]),
            scored("b", &["co-op"]),
            scored("c", &["co-op"]),
        ];
        let balanced = rebalancer.rebalance(ordered, 3);
        assert_eq!(ids(&balanced), vec!["a", "b", "c"]);
    }
}
