use std::collections::HashMap;

use dealfeed_core::{
    rank_for_profile, CandidateItem, DeterministicFeedRanker, DomainError, ExpanderTag,
    FeedRanker, PageRequest, RankSeed, RankedFeed, RankingConfig, Taxonomy,
    UserPreferenceProfile,
};
use rust_decimal::Decimal;

const LABELS: [&str; 8] =
    ["Racing", "Rollenspiel", "Puzzle", "Shooter", "Aventura", "Sport", "アクション", "Indie"];

fn mixed_pool(size: usize) -> Vec<CandidateItem> {
    (0..size)
        .map(|n| {
            let mut item = CandidateItem::new(format!("deal-{n}"))
                .with_discount((n * 17 % 90) as f64)
                .with_price(Decimal::new((n * 7 % 60 + 1) as i64, 0));
            if n % 5 != 4 {
                item = item.with_genres([LABELS[n % LABELS.len()]]);
            }
            if n % 3 == 0 {
                item = item.with_popularity((n * 31 % 100) as f64);
            }
            if n % 11 == 0 {
                item = item.with_tags(["Online Co-Op"]);
            }
            item
        })
        .collect()
}

/// Half racing matches, half items that score exactly zero for a racing profile.
fn split_pool(matched: usize, unmatched: usize) -> Vec<CandidateItem> {
    let hits = (0..matched).map(|n| CandidateItem::new(format!("hit-{n}")).with_genres(["Racing"]));
    let misses = (0..unmatched)
        .map(|n| CandidateItem::new(format!("miss-{n}")).with_discount((n % 30) as f64));
    hits.chain(misses).collect()
}

fn racing_profile() -> UserPreferenceProfile {
    UserPreferenceProfile::new(["racing", "rpg"]).with_max_price(Decimal::new(40, 0))
}

fn request(page: i64, page_size: i64) -> PageRequest {
    PageRequest::new(page, page_size).expect("valid page request")
}

fn ids(feed: &RankedFeed) -> Vec<String> {
    feed.page.items.iter().map(|candidate| candidate.item.id.as_str().to_owned()).collect()
}

#[test]
fn every_item_appears_exactly_once_across_pages() {
    let items = mixed_pool(57);
    let profile = racing_profile();

    for diversity_cap in [None, Some(0.4)] {
        let config = RankingConfig { diversity_cap, ..RankingConfig::default() };
        let ranker = DeterministicFeedRanker::new(config, Taxonomy::builtin());

        for page_size in [1_i64, 4, 10, 20, 57, 80] {
            for seed in [0_u64, 17, 9_000_001] {
                let pages = (items.len() as i64 + page_size - 1) / page_size;
                let mut seen: HashMap<String, usize> = HashMap::new();
                for page in 1..=pages {
                    let feed = ranker
                        .rank_feed(&items, &profile, request(page, page_size), RankSeed(seed))
                        .expect("ranking succeeds");
                    for id in ids(&feed) {
                        *seen.entry(id).or_default() += 1;
                    }
                }

                assert_eq!(seen.len(), items.len(), "page_size={page_size} seed={seed}");
                assert!(seen.values().all(|count| *count == 1), "duplicate for {page_size}");
            }
        }
    }
}

#[test]
fn identical_arguments_give_identical_pages() {
    let ranker = DeterministicFeedRanker::default();
    let items = mixed_pool(40);
    let profile = racing_profile();

    let first = ranker.rank_feed(&items, &profile, request(2, 10), RankSeed(77)).expect("ranks");
    let second = ranker.rank_feed(&items, &profile, request(2, 10), RankSeed(77)).expect("ranks");
    assert_eq!(first, second);

    let anonymous = ranker.rank_without_preferences(&items, request(1, 10), RankSeed(5));
    assert_eq!(anonymous, ranker.rank_without_preferences(&items, request(1, 10), RankSeed(5)));
}

#[test]
fn exploration_share_is_bounded_when_unmatched_pool_is_large_enough() {
    let ranker = DeterministicFeedRanker::default();
    let profile = UserPreferenceProfile::new(["racing"]);
    let items = split_pool(30, 30);

    for page_size in [10_usize, 20, 40] {
        let lower = (page_size as f64 * 0.10).ceil() as usize;
        let upper = (page_size as f64 * 0.15).ceil() as usize;
        for seed in 0..25_u64 {
            let feed = ranker
                .rank_feed(&items, &profile, request(1, page_size as i64), RankSeed(seed))
                .expect("ranking succeeds");

            let explored = feed.metadata.exploration_count;
            assert!(
                (lower..=upper).contains(&explored),
                "page_size={page_size} seed={seed}: {explored} not in {lower}..={upper}"
            );
            assert!(feed
                .page
                .items
                .iter()
                .filter(|candidate| candidate.is_exploration)
                .all(|candidate| candidate.expander == Some(ExpanderTag::E4)));
        }
    }
}

#[test]
fn explorers_are_interleaved_rather_than_appended() {
    let ranker = DeterministicFeedRanker::default();
    let profile = UserPreferenceProfile::new(["racing"]);
    let items = split_pool(30, 30);

    let feed = ranker.rank_feed(&items, &profile, request(1, 20), RankSeed(3)).expect("ranks");
    let positions: Vec<usize> = feed
        .page
        .items
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.is_exploration)
        .map(|(position, _)| position)
        .collect();

    assert!(!positions.is_empty());
    assert!(positions[0] < feed.page.items.len() - positions.len());
}

#[test]
fn equal_scores_break_ties_by_discount_then_popularity() {
    let mut config = RankingConfig::default();
    config.weights.popularity = 0.0;
    let ranker = DeterministicFeedRanker::new(config, Taxonomy::builtin());
    let profile = UserPreferenceProfile::new(["racing"]);
    let items = vec![
        CandidateItem::new("first-plain").with_genres(["Racing"]),
        CandidateItem::new("popular").with_genres(["Racing"]).with_popularity(60.0),
        CandidateItem::new("discounted").with_genres(["Racing"]).with_discount(20.0),
        CandidateItem::new("more-popular").with_genres(["Racing"]).with_popularity(70.0),
        CandidateItem::new("second-plain").with_genres(["Racing"]),
    ];

    let feed = ranker.rank_feed(&items, &profile, request(1, 5), RankSeed(1)).expect("ranks");
    assert_eq!(
        ids(&feed),
        vec!["discounted", "more-popular", "popular", "first-plain", "second-plain"]
    );
}

#[test]
fn exploration_items_in_a_window_keep_the_tie_break() {
    let ranker = DeterministicFeedRanker::default();
    let profile = UserPreferenceProfile::new(["racing"]);
    let hits = (0..20).map(|n| CandidateItem::new(format!("hit-{n}")).with_genres(["Racing"]));
    let misses = (0..10)
        .map(|n| CandidateItem::new(format!("miss-{n}")).with_discount((n * 2) as f64));
    let items: Vec<CandidateItem> = hits.chain(misses).collect();

    for seed in 0..50_u64 {
        let feed = ranker
            .rank_feed(&items, &profile, request(1, 20), RankSeed(seed))
            .expect("ranking succeeds");
        let discounts: Vec<f64> = feed
            .page
            .items
            .iter()
            .filter(|candidate| candidate.is_exploration)
            .map(|candidate| candidate.item.discount())
            .collect();

        assert!(!discounts.is_empty(), "seed={seed}: no exploration slots");
        assert!(
            discounts.windows(2).all(|pair| pair[0] >= pair[1]),
            "seed={seed}: explorers out of order {discounts:?}"
        );
    }
}

#[test]
fn empty_profile_orders_like_no_preference_ranking() {
    let ranker = DeterministicFeedRanker::default();
    let items = mixed_pool(33);
    let empty = UserPreferenceProfile::default();

    for seed in [1_u64, 2, 3] {
        for page in 1..=4 {
            let personal = ranker
                .rank_feed(&items, &empty, request(page, 10), RankSeed(seed))
                .expect("ranks");
            let anonymous = ranker
                .rank_without_preferences(&items, request(page, 10), RankSeed(seed))
                .expect("ranks");
            assert_eq!(ids(&personal), ids(&anonymous), "seed={seed} page={page}");
        }
    }
}

#[test]
fn genreless_profile_with_sub_preferences_gets_the_no_preference_feed() {
    let ranker = DeterministicFeedRanker::default();
    let items = vec![
        CandidateItem::new("cheap").with_price(Decimal::new(10, 0)).with_popularity(40.0),
        CandidateItem::new("pricey").with_price(Decimal::new(90, 0)).with_popularity(20.0),
    ];
    let budget_only = UserPreferenceProfile::default().with_max_price(Decimal::new(50, 0));

    let routed = rank_for_profile(&ranker, &items, Some(&budget_only), request(1, 2), RankSeed(4))
        .expect("ranking succeeds");
    let anonymous = ranker
        .rank_without_preferences(&items, request(1, 2), RankSeed(4))
        .expect("ranking succeeds");

    assert_eq!(routed, anonymous);
    assert_eq!(routed.metadata.exploration_count, 2);
}

#[test]
fn storefront_scenario_ranks_as_documented() {
    let ranker = DeterministicFeedRanker::default();
    let profile = UserPreferenceProfile::new(["racing"]).with_max_price(Decimal::new(50, 0));
    let items = vec![
        CandidateItem::new("D1").with_genres(["Racing"]).with_discount(0.0).with_popularity(0.0),
        CandidateItem::new("D2")
            .with_genres(["RPG"])
            .with_discount(50.0)
            .trending()
            .with_popularity(90.0),
        CandidateItem::new("D3").with_discount(80.0).with_popularity(10.0),
        CandidateItem::new("D4")
            .with_genres(["Racing", "Sports"])
            .with_discount(10.0)
            .with_popularity(30.0),
    ];

    let feed = ranker.rank_feed(&items, &profile, request(1, 4), RankSeed(2024)).expect("ranks");
    assert_eq!(ids(&feed), vec!["D4", "D1", "D2", "D3"]);

    let scores: Vec<f64> = feed.page.items.iter().map(|candidate| candidate.score).collect();
    for (actual, expected) in scores.iter().zip([101.5, 100.0, 29.5, 15.5]) {
        assert!((actual - expected).abs() < 1e-9, "score {actual} != {expected}");
    }

    let tags: Vec<Option<ExpanderTag>> =
        feed.page.items.iter().map(|candidate| candidate.expander).collect();
    assert_eq!(tags, vec![None, None, Some(ExpanderTag::E2), Some(ExpanderTag::E3)]);

    assert_eq!(feed.metadata.exploration_count, 0);
    assert_eq!(feed.metadata.matched_count, 4);
    assert_eq!(feed.metadata.expanders, vec![ExpanderTag::E2, ExpanderTag::E3]);
}

#[test]
fn empty_pool_returns_empty_page_with_zero_metadata() {
    let ranker = DeterministicFeedRanker::default();
    let feed = ranker
        .rank_feed(&[], &racing_profile(), request(1, 20), RankSeed(0))
        .expect("ranking succeeds");

    assert!(feed.page.items.is_empty());
    assert_eq!(feed.metadata.total, 0);
    assert_eq!(feed.metadata.average_score, 0.0);
    assert!(feed.metadata.expanders.is_empty());
}

#[test]
fn caller_errors_are_rejected_before_ranking() {
    assert_eq!(PageRequest::new(1, 0), Err(DomainError::InvalidPageSize(0)));
    assert_eq!(PageRequest::new(-2, 10), Err(DomainError::InvalidPage(-2)));
}

#[test]
fn sparse_upstream_records_rank_without_errors() {
    let items: Vec<CandidateItem> = serde_json::from_str(
        r#"[
            {"id": "a", "genres": [{"name": "Rennspiel"}], "price": "12.99"},
            {"id": "b", "genres": [42, null], "popularity": null},
            {"id": "c"}
        ]"#,
    )
    .expect("sparse pool deserializes");

    let ranker = DeterministicFeedRanker::default();
    let profile = UserPreferenceProfile::new(["racing"]);
    let feed = ranker.rank_feed(&items, &profile, request(1, 10), RankSeed(8)).expect("ranks");

    assert_eq!(feed.page.items.len(), 3);
    assert_eq!(feed.page.items[0].item.id.as_str(), "a");
}
