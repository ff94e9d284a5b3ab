use crate::models::{
    GroupedResult, Item, Popularity, Preferences, RankedCandidate, RecommendationGroups,
};

use super::ranker::Recommender;

/// Score at or above which a candidate is a best match regardless of flags
const BEST_SCORE: f64 = 0.8;
/// Hidden gems must sit below these popularity ceilings
const HIDDEN_GEM_MAX_RATING: f64 = 7.8;
const HIDDEN_GEM_MAX_LISTENERS: f64 = 1400.0;

/// Which preferences a candidate satisfies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchFlags {
    pub genre: bool,
    /// Preferred artist-or-director credit matches the item's artist or director
    pub credit: bool,
    pub actor: bool,
    /// Item is by the preferred artist but outside the preferred genre
    pub cross_genre_artist: bool,
}

impl MatchFlags {
    pub fn evaluate(item: &Item, prefs: &Preferences) -> Self {
        let genre = prefs.genre() == Some(item.genre.as_str());
        let same_artist = prefs
            .artist()
            .is_some_and(|artist| item.artist.as_deref() == Some(artist));
        Self {
            genre,
            credit: prefs
                .preferred_credit()
                .is_some_and(|credit| item.credited_to(credit)),
            actor: prefs.actor().is_some_and(|actor| item.has_actor(actor)),
            // with no preferred genre there is nothing to differ from
            cross_genre_artist: same_artist && prefs.genre().is_some() && !genre,
        }
    }

    pub fn count(&self) -> usize {
        [self.genre, self.credit, self.actor]
            .iter()
            .filter(|f| **f)
            .count()
    }

    pub fn description(&self) -> String {
        let mut matches = Vec::new();
        if self.genre {
            matches.push("Genre");
        }
        if self.credit {
            matches.push("Director/Artist");
        }
        if self.actor {
            matches.push("Actor");
        }
        if matches.is_empty() {
            "None".to_string()
        } else {
            matches.join(", ")
        }
    }
}

/// Outcome of the ordered classification rules; the first rule that applies wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Two or more matches, or a high enough score
    Best,
    /// Genre is the only match and the item is not too popular
    HiddenGem,
    /// Preferred artist in a genre other than the preferred one
    CrossGenreArtist,
    /// Exactly one match
    Similar,
    Excluded,
}

/// The result bucket a classification lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Best,
    Similar,
    Hidden,
}

impl Classification {
    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            Classification::Best => Some(Bucket::Best),
            Classification::HiddenGem => Some(Bucket::Hidden),
            Classification::CrossGenreArtist | Classification::Similar => Some(Bucket::Similar),
            Classification::Excluded => None,
        }
    }
}

fn below_hidden_gem_ceiling(popularity: Popularity) -> bool {
    match popularity {
        Popularity::Rating(rating) => rating < HIDDEN_GEM_MAX_RATING,
        Popularity::Listeners(listeners) => listeners < HIDDEN_GEM_MAX_LISTENERS,
        Popularity::Unknown => false,
    }
}

/// Applies the classification rules in order
pub fn classify(flags: &MatchFlags, score: f64, popularity: Popularity) -> Classification {
    let count = flags.count();
    if count >= 2 || score >= BEST_SCORE {
        Classification::Best
    } else if flags.genre && count == 1 && below_hidden_gem_ceiling(popularity) {
        Classification::HiddenGem
    } else if flags.cross_genre_artist {
        Classification::CrossGenreArtist
    } else if count == 1 {
        Classification::Similar
    } else {
        Classification::Excluded
    }
}

fn sort_group(group: &mut [GroupedResult]) {
    group.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.popularity.total_cmp(&a.popularity))
    });
}

impl Recommender {
    /// Splits ranked candidates into best / similar / hidden groups.
    ///
    /// Each candidate lands in at most one group; candidates no rule accepts
    /// are dropped. Groups are sorted by (score, popularity) descending.
    pub fn group_recommendations(
        &self,
        ranked: &[RankedCandidate],
        prefs: &Preferences,
    ) -> RecommendationGroups {
        let mut groups = RecommendationGroups::default();

        for candidate in ranked {
            let Some(item) = self.get(&candidate.id) else {
                tracing::debug!(id = %candidate.id, "Skipping candidate missing from catalog");
                continue;
            };

            let flags = MatchFlags::evaluate(item, prefs);
            let popularity = item.popularity();
            let classification = classify(&flags, candidate.score, popularity);

            let match_description = match classification {
                Classification::CrossGenreArtist => format!(
                    "Artist ({}) - different genre ({})",
                    prefs.artist().unwrap_or_default(),
                    item.genre
                ),
                _ => flags.description(),
            };

            let result = GroupedResult {
                id: candidate.id.clone(),
                score: candidate.score,
                match_description,
                popularity: popularity.value(),
            };

            match classification.bucket() {
                Some(Bucket::Best) => groups.best.push(result),
                Some(Bucket::Similar) => groups.similar.push(result),
                Some(Bucket::Hidden) => groups.hidden.push(result),
                None => {}
            }
        }

        sort_group(&mut groups.best);
        sort_group(&mut groups.similar);
        sort_group(&mut groups.hidden);
        groups
    }
}
