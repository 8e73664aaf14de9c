use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::item::CandidateItem;
use crate::errors::DomainError;
use crate::taxonomy::GenreSlug;

/// Names the fallback strategy that explains why an item sits where it does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpanderTag {
    /// Related-genre match.
    E1,
    /// Trending or highly popular.
    E2,
    /// High discount.
    E3,
    /// Exploration slot.
    E4,
    /// Backfill from the unmatched pool.
    E5,
    /// Price relaxation.
    E6,
}

impl ExpanderTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E1 => "E1",
            Self::E2 => "E2",
            Self::E3 => "E3",
            Self::E4 => "E4",
            Self::E5 => "E5",
            Self::E6 => "E6",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::E1 => "related genre",
            Self::E2 => "trending",
            Self::E3 => "high discount",
            Self::E4 => "exploration",
            Self::E5 => "backfill",
            Self::E6 => "price relaxation",
        }
    }
}

impl fmt::Display for ExpanderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: CandidateItem,
    pub genres: BTreeSet<GenreSlug>,
    pub score: f64,
    pub matched: Vec<String>,
    pub expander: Option<ExpanderTag>,
    pub is_exploration: bool,
}

impl ScoredItem {
    pub fn is_matched(&self) -> bool {
        self.score > 0.0
    }

    /// Sets the tag only when no earlier step already explained this item.
    pub fn tag_if_untagged(&mut self, tag: ExpanderTag) {
        if self.expander.is_none() {
            self.expander = Some(tag);
        }
    }

    pub fn mark_exploration(&mut self) {
        self.is_exploration = true;
        self.tag_if_untagged(ExpanderTag::E4);
    }
}

/// A validated page request. Pages are 1-based; page 0 is read as the first page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Result<Self, DomainError> {
        if page_size <= 0 {
            return Err(DomainError::InvalidPageSize(page_size));
        }
        if page < 0 {
            return Err(DomainError::InvalidPage(page));
        }

        let page_size = usize::try_from(page_size)
            .map_err(|_| DomainError::InvalidPageSize(page_size))?;
        let page = usize::try_from(page).map_err(|_| DomainError::InvalidPage(page))?.max(1);

        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first item of this page in the full ordering.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<ScoredItem>,
    pub page: usize,
    pub page_size: usize,
}

impl FeedPage {
    pub fn empty(request: PageRequest) -> Self {
        Self { items: Vec::new(), page: request.page(), page_size: request.page_size() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub total: usize,
    pub matched_count: usize,
    pub exploration_count: usize,
    pub expanders: Vec<ExpanderTag>,
    pub match_ratio: f64,
    pub exploration_ratio: f64,
    pub average_score: f64,
}
