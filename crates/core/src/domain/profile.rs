use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::taxonomy::GenreSlug;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPreferences {
    #[serde(default)]
    pub multiplayer: bool,
    #[serde(default)]
    pub coop: bool,
    #[serde(default)]
    pub singleplayer: bool,
    #[serde(default)]
    pub localized_text: bool,
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

impl SubPreferences {
    pub fn is_empty(&self) -> bool {
        !self.multiplayer
            && !self.coop
            && !self.singleplayer
            && !self.localized_text
            && self.max_price.is_none()
    }
}

/// A user's or anonymous device's stated interests, as resolved by the preference store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferenceProfile {
    #[serde(default)]
    pub genres: BTreeSet<GenreSlug>,
    #[serde(default)]
    pub sub_preferences: SubPreferences,
    #[serde(default)]
    pub onboarding_completed: bool,
}

impl UserPreferenceProfile {
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            genres: genres.into_iter().map(|slug| GenreSlug::new(slug.as_ref())).collect(),
            sub_preferences: SubPreferences::default(),
            onboarding_completed: true,
        }
    }

    pub fn with_max_price(mut self, max_price: Decimal) -> Self {
        self.sub_preferences.max_price = Some(max_price);
        self
    }

    pub fn with_sub_preferences(mut self, sub_preferences: SubPreferences) -> Self {
        self.sub_preferences = sub_preferences;
        self
    }

    pub fn has_genres(&self) -> bool {
        !self.genres.is_empty()
    }

    /// No genres and no sub-preferences: nothing for the scorer to personalize on.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.sub_preferences.is_empty()
    }
}
