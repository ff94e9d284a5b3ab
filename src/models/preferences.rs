use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sparse user preferences for a single recommendation request
///
/// Every field is optional. Absent or empty fields never match anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    /// Desired feature names (mood/traits); repeated names collapse to one
    #[serde(default)]
    pub features: BTreeSet<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl Preferences {
    /// Creates empty preferences
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = Some(director.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Adds a desired feature, ignoring duplicates
    pub fn add_feature(&mut self, feature: impl Into<String>) {
        self.features.insert(feature.into());
    }

    pub fn genre(&self) -> Option<&str> {
        present(&self.genre)
    }

    pub fn artist(&self) -> Option<&str> {
        present(&self.artist)
    }

    pub fn director(&self) -> Option<&str> {
        present(&self.director)
    }

    pub fn actor(&self) -> Option<&str> {
        present(&self.actor)
    }

    /// The single creative credit to match: artist if set, otherwise director
    pub fn preferred_credit(&self) -> Option<&str> {
        self.artist().or_else(|| self.director())
    }

    /// Requested feature names, skipping blanks
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.features
            .iter()
            .map(String::as_str)
            .filter(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_preferences_match_nothing() {
        let prefs = Preferences::new();
        assert!(prefs.genre().is_none());
        assert!(prefs.preferred_credit().is_none());
        assert!(prefs.actor().is_none());
        assert_eq!(prefs.features().count(), 0);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let json = r#"{"genre": "", "director": "", "actor": "", "features": [""]}"#;
        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert!(prefs.genre().is_none());
        assert!(prefs.director().is_none());
        assert!(prefs.actor().is_none());
        assert_eq!(prefs.features().count(), 0);
    }

    #[test]
    fn test_preferred_credit_uses_artist_first() {
        let prefs = Preferences::new()
            .with_director("Nolan")
            .with_artist("Adele");
        assert_eq!(prefs.preferred_credit(), Some("Adele"));

        let prefs = Preferences::new().with_director("Nolan");
        assert_eq!(prefs.preferred_credit(), Some("Nolan"));

        let prefs = Preferences::new().with_director("Nolan").with_artist("");
        assert_eq!(prefs.preferred_credit(), Some("Nolan"));
    }

    #[test]
    fn test_add_feature_ignores_duplicates() {
        let mut prefs = Preferences::new();
        prefs.add_feature("dark");
        prefs.add_feature("dark");
        prefs.add_feature("uplifting");
        let features: Vec<&str> = prefs.features().collect();
        assert_eq!(features, ["dark", "uplifting"]);
    }

    #[test]
    fn test_deserialize_collapses_repeated_features() {
        let json = r#"{"features": ["happy", "happy", "calm", "happy"]}"#;
        let prefs: Preferences = serde_json::from_str(json).unwrap();
        let features: Vec<&str> = prefs.features().collect();
        assert_eq!(features, ["calm", "happy"]);
    }

    #[test]
    fn test_deserialize_partial() {
        let prefs: Preferences = serde_json::from_str(r#"{"genre": "Jazz"}"#).unwrap();
        assert_eq!(prefs.genre(), Some("Jazz"));
        assert!(prefs.features.is_empty());
    }
}
