use serde::{Deserialize, Serialize};

pub mod item;
pub mod preferences;

pub use item::{CatalogKind, Item, Popularity};
pub use preferences::Preferences;

/// A ranked recommendation candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: String,
    /// Non-negative, unbounded relevance score
    pub score: f64,
}

impl RankedCandidate {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// A candidate placed into one of the result groups, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedResult {
    pub id: String,
    pub score: f64,
    /// Which preferences matched, e.g. "Genre, Director/Artist" or "None"
    pub match_description: String,
    /// Rating or listener count, only used for ordering
    pub popularity: f64,
}

/// The three ordered result buckets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroups {
    pub best: Vec<GroupedResult>,
    pub similar: Vec<GroupedResult>,
    pub hidden: Vec<GroupedResult>,
}

impl RecommendationGroups {
    pub fn len(&self) -> usize {
        self.best.len() + self.similar.len() + self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
