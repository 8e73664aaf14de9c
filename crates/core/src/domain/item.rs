use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// One category entry as delivered by an upstream store.
///
/// Stores disagree on the shape: some send a bare label, some an object with a name and a
/// description. Anything else lands in `Other` and contributes nothing to normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCategory {
    Label(String),
    Described {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    Other(serde_json::Value),
}

impl RawCategory {
    /// The text the normalizer should look at, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Label(label) => Some(label.as_str()),
            Self::Described { name: Some(name), .. } if !name.trim().is_empty() => {
                Some(name.as_str())
            }
            Self::Described { description, .. } => description.as_deref(),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for RawCategory {
    fn from(value: &str) -> Self {
        Self::Label(value.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: ItemId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Vec<RawCategory>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub localized_text: bool,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub store: Option<String>,
}

impl CandidateItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ItemId(id.into()),
            title: None,
            genres: Vec::new(),
            tags: Vec::new(),
            price: None,
            discount_percent: None,
            popularity: None,
            trending: false,
            localized_text: false,
            release_date: None,
            store: None,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(|genre| RawCategory::Label(genre.into())).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_discount(mut self, discount_percent: f64) -> Self {
        self.discount_percent = Some(discount_percent);
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn trending(mut self) -> Self {
        self.trending = true;
        self
    }

    pub fn with_localized_text(mut self) -> Self {
        self.localized_text = true;
        self
    }

    /// Discount percent clamped to `0..=100`; missing or NaN reads as zero.
    pub fn discount(&self) -> f64 {
        sanitize_percent(self.discount_percent)
    }

    /// Popularity clamped to `0..=100`; missing or NaN reads as zero.
    pub fn popularity_score(&self) -> f64 {
        sanitize_percent(self.popularity)
    }

    /// Every raw string that may carry genre signal: category entries first, then tags.
    pub fn raw_labels(&self) -> impl Iterator<Item = &str> {
        self.genres
            .iter()
            .filter_map(RawCategory::text)
            .chain(self.tags.iter().map(String::as_str))
    }
}

fn sanitize_percent(value: Option<f64>) -> f64 {
    match value {
        Some(value) if value.is_finite() => value.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::{CandidateItem, RawCategory};

    #[test]
    fn heterogeneous_category_shapes_deserialize() {
        let item: CandidateItem = serde_json::from_str(
            r#"{
                "id": "steam-42",
                "genres": ["Action", {"name": "Rollenspiel", "description": "RPG"}, 7, {"name": 3}],
                "tags": ["Co-op"]
            }"#,
        )
        .expect("sparse record should deserialize");

        assert_eq!(item.genres.len(), 4);
        assert_eq!(item.genres[0].text(), Some("Action"));
        assert_eq!(item.genres[1].text(), Some("Rollenspiel"));
        assert!(matches!(item.genres[2], RawCategory::Other(_)));
        assert_eq!(item.genres[3].text(), None);
        assert_eq!(item.raw_labels().collect::<Vec<_>>(), vec!["Action", "Rollenspiel", "Co-op"]);
    }

    #[test]
    fn described_category_falls_back_to_description() {
        let category = RawCategory::Described {
            name: Some("  ".to_owned()),
            description: Some("Puzzle".to_owned()),
        };
        assert_eq!(category.text(), Some("Puzzle"));
    }

    #[test]
    fn missing_and_nan_signals_read_as_zero() {
        let item = CandidateItem::new("x").with_popularity(f64::NAN).with_discount(140.0);
        assert_eq!(item.popularity_score(), 0.0);
        assert_eq!(item.discount(), 100.0);
        assert_eq!(CandidateItem::new("y").discount(), 0.0);
    }
}
