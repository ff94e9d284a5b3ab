use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::AppError;

/// Which homogeneous catalog an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Movies,
    Music,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 2] = [CatalogKind::Movies, CatalogKind::Music];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Movies => "movies",
            CatalogKind::Music => "music",
        }
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" => Ok(CatalogKind::Movies),
            "music" => Ok(CatalogKind::Music),
            other => Err(AppError::InvalidInput(format!(
                "Unknown catalog '{}', expected 'movies' or 'music'",
                other
            ))),
        }
    }
}

/// The popularity signal an item carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Popularity {
    /// Movie rating on a 0-10 scale
    Rating(f64),
    /// Song listener count, in thousands
    Listeners(f64),
    Unknown,
}

impl Popularity {
    /// Raw value used for tie-breaking and display; 0 when unknown
    pub fn value(&self) -> f64 {
        match self {
            Popularity::Rating(v) | Popularity::Listeners(v) => *v,
            Popularity::Unknown => 0.0,
        }
    }
}

/// A catalog record (movie or song). Never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Stable unique identifier within its catalog
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listeners: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<String>,
    /// Mood/trait intensities keyed by feature name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, f64>,
}

impl Item {
    /// Creates an item with only the required fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            genre: genre.into(),
            rating: None,
            listeners: None,
            director: None,
            artist: None,
            album: None,
            actors: Vec::new(),
            features: BTreeMap::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_listeners(mut self, listeners: f64) -> Self {
        self.listeners = Some(listeners);
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = Some(director.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_actors<I, S>(mut self, actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actors = actors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_feature(mut self, name: impl Into<String>, intensity: f64) -> Self {
        self.features.insert(name.into(), intensity);
        self
    }

    /// Rating takes precedence over listeners when both are present
    pub fn popularity(&self) -> Popularity {
        match (self.rating, self.listeners) {
            (Some(rating), _) => Popularity::Rating(rating),
            (None, Some(listeners)) => Popularity::Listeners(listeners),
            (None, None) => Popularity::Unknown,
        }
    }

    pub fn has_actor(&self, actor: &str) -> bool {
        self.actors.iter().any(|a| a == actor)
    }

    /// True when the two actor lists share at least one name
    pub fn shares_actor_with(&self, other: &Item) -> bool {
        if self.actors.is_empty() || other.actors.is_empty() {
            return false;
        }
        let mine: HashSet<&str> = self.actors.iter().map(String::as_str).collect();
        other.actors.iter().any(|a| mine.contains(a.as_str()))
    }

    /// Whether `credit` names this item's artist or director
    pub fn credited_to(&self, credit: &str) -> bool {
        self.artist.as_deref() == Some(credit) || self.director.as_deref() == Some(credit)
    }
}
