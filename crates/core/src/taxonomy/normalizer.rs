use std::collections::BTreeSet;

use crate::domain::item::CandidateItem;
use crate::taxonomy::{
    fold_label, GenreSlug, Taxonomy, SIGNAL_COOP, SIGNAL_MULTIPLAYER, SIGNAL_SINGLEPLAYER,
};

/// ASCII labels shorter than this must match a whole word ("rpg", "fps", "4x").
const SHORT_LABEL_LEN: usize = 4;

/// Play-mode keyword fragments and the signal slug each one implies.
const PLAY_MODE_KEYWORDS: &[(&str, &str)] = &[
    ("multiplayer", SIGNAL_MULTIPLAYER),
    ("multi-player", SIGNAL_MULTIPLAYER),
    ("mehrspieler", SIGNAL_MULTIPLAYER),
    ("multijoueur", SIGNAL_MULTIPLAYER),
    ("multijugador", SIGNAL_MULTIPLAYER),
    ("multijogador", SIGNAL_MULTIPLAYER),
    ("multigiocatore", SIGNAL_MULTIPLAYER),
    ("pvp", SIGNAL_MULTIPLAYER),
    ("マルチプレイ", SIGNAL_MULTIPLAYER),
    ("co-op", SIGNAL_COOP),
    ("coop", SIGNAL_COOP),
    ("cooperative", SIGNAL_COOP),
    ("co-operative", SIGNAL_COOP),
    ("koop", SIGNAL_COOP),
    ("coopérati", SIGNAL_COOP),
    ("cooperativo", SIGNAL_COOP),
    ("協力", SIGNAL_COOP),
    ("single", SIGNAL_SINGLEPLAYER),
    ("singleplayer", SIGNAL_SINGLEPLAYER),
    ("einzelspieler", SIGNAL_SINGLEPLAYER),
    ("un jugador", SIGNAL_SINGLEPLAYER),
    ("un joueur", SIGNAL_SINGLEPLAYER),
    ("giocatore singolo", SIGNAL_SINGLEPLAYER),
    ("シングルプレイ", SIGNAL_SINGLEPLAYER),
];

/// Maps an item's raw, multi-language category and tag strings onto canonical slugs.
///
/// This is the only place that reads raw category fields; everything downstream works on the
/// returned slug set.
#[derive(Clone, Copy, Debug)]
pub struct GenreNormalizer<'t> {
    taxonomy: &'t Taxonomy,
}

impl<'t> GenreNormalizer<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn normalize(&self, item: &CandidateItem) -> BTreeSet<GenreSlug> {
        let mut genres = BTreeSet::new();
        for raw in item.raw_labels() {
            self.collect(raw, &mut genres);
        }
        genres
    }

    pub fn normalize_label(&self, raw: &str) -> BTreeSet<GenreSlug> {
        let mut genres = BTreeSet::new();
        self.collect(raw, &mut genres);
        genres
    }

    fn collect(&self, raw: &str, genres: &mut BTreeSet<GenreSlug>) {
        let folded = fold_label(raw);
        if folded.is_empty() {
            return;
        }

        if let Some(slug) = self.taxonomy.exact(&folded) {
            genres.insert(slug.clone());
        } else {
            for (label, slug) in self.taxonomy.folded_labels() {
                if !genres.contains(slug) && label_occurs(&folded, label) {
                    genres.insert(slug.clone());
                }
            }
        }

        for (fragment, signal) in PLAY_MODE_KEYWORDS {
            if folded.contains(fragment) {
                genres.insert(GenreSlug::new(signal));
            }
        }
    }
}

/// Substring match that respects word starts for ASCII labels, so "sport" does not fire inside
/// "esports" and "rpg" does not fire inside "rpgmaker". Non-ASCII labels (accented or CJK)
/// match anywhere.
fn label_occurs(haystack: &str, label: &str) -> bool {
    if !label.is_ascii() {
        return haystack.contains(label);
    }

    let needs_word_end = label.len() < SHORT_LABEL_LEN;
    haystack.match_indices(label).any(|(start, _)| {
        let starts_word =
            haystack[..start].chars().next_back().map_or(true, |c| !c.is_ascii_alphanumeric());
        let ends_word = haystack[start + label.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_ascii_alphanumeric());
        starts_word && (ends_word || !needs_word_end)
    })
}
