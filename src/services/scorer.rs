use crate::models::{Item, Popularity, Preferences};

const GENRE_MATCH: f64 = 0.5;
const CREDIT_MATCH: f64 = 0.3;
const ACTOR_MATCH: f64 = 0.2;
const FEATURE_MATCH: f64 = 0.05;
const POPULARITY_WEIGHT: f64 = 0.1;
const RATING_SCALE: f64 = 10.0;
/// Listener counts are stored in thousands; ~2M listeners is the top of the range
const LISTENER_SCALE: f64 = 2000.0;

/// Preference-alignment score for a single item
///
/// Pure and total: a sum of non-negative components, rounded to three
/// decimals. Missing preference fields contribute nothing.
pub fn score_item(item: &Item, prefs: &Preferences) -> f64 {
    let mut score = 0.0;

    if prefs.genre() == Some(item.genre.as_str()) {
        score += GENRE_MATCH;
    }

    if let Some(credit) = prefs.preferred_credit() {
        if item.credited_to(credit) {
            score += CREDIT_MATCH;
        }
    }

    if let Some(actor) = prefs.actor() {
        if item.has_actor(actor) {
            score += ACTOR_MATCH;
        }
    }

    // presence only, intensity is ignored
    let feature_hits = prefs
        .features()
        .filter(|f| item.features.get(*f).is_some_and(|v| *v != 0.0))
        .count();
    score += FEATURE_MATCH * feature_hits as f64;

    score += popularity_term(item.popularity());

    round3(score)
}

fn popularity_term(popularity: Popularity) -> f64 {
    let term = match popularity {
        Popularity::Rating(rating) => POPULARITY_WEIGHT * (rating / RATING_SCALE),
        Popularity::Listeners(listeners) => POPULARITY_WEIGHT * (listeners / LISTENER_SCALE),
        Popularity::Unknown => 0.0,
    };
    term.max(0.0)
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
