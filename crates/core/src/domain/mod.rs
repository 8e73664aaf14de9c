pub mod feed;
pub mod item;
pub mod profile;

pub use feed::{ExpanderTag, FeedPage, PageMetadata, PageRequest, ScoredItem};
pub use item::{CandidateItem, ItemId, RawCategory};
pub use profile::{SubPreferences, UserPreferenceProfile};
