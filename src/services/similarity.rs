use std::collections::BTreeMap;

use crate::models::{CatalogKind, Item};

use super::graph::SimilarityGraph;

/// Cosine similarity over the feature keys both maps share.
///
/// Keys present in only one map do not participate. Returns 0.0 when either
/// map is empty, no keys are shared, or either restricted vector has zero
/// magnitude.
pub fn cosine_similarity(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    let mut shared = 0usize;

    for (key, va) in a {
        if let Some(vb) = b.get(key) {
            dot += va * vb;
            norm_a += va * va;
            norm_b += vb * vb;
            shared += 1;
        }
    }

    if shared == 0 {
        return 0.0;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    let result = dot / denom;
    if !result.is_finite() {
        return 0.0;
    }
    result.clamp(-1.0, 1.0)
}

/// Per-catalog rules for how strongly two items relate
pub trait SimilarityStrategy: Send + Sync {
    /// Raw composite weight before clamping
    fn weight(&self, a: &Item, b: &Item) -> f64;

    /// An edge is created only when the clamped weight is strictly above this
    fn threshold(&self) -> f64;
}

fn same_credit(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

/// Movies: genre, director, shared cast and feature similarity
#[derive(Debug, Clone, Copy, Default)]
pub struct MovieSimilarity;

impl MovieSimilarity {
    pub const GENRE: f64 = 0.2;
    pub const DIRECTOR: f64 = 0.4;
    pub const SHARED_ACTOR: f64 = 0.3;
    pub const FEATURES: f64 = 0.3;
}

impl SimilarityStrategy for MovieSimilarity {
    fn weight(&self, a: &Item, b: &Item) -> f64 {
        let mut w = 0.0;
        if a.genre == b.genre {
            w += Self::GENRE;
        }
        if same_credit(&a.director, &b.director) {
            w += Self::DIRECTOR;
        }
        if a.shares_actor_with(b) {
            w += Self::SHARED_ACTOR;
        }
        w + Self::FEATURES * cosine_similarity(&a.features, &b.features)
    }

    fn threshold(&self) -> f64 {
        0.0
    }
}

/// Music: genre, artist, album and feature similarity
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicSimilarity;

impl MusicSimilarity {
    pub const GENRE: f64 = 0.2;
    pub const ARTIST: f64 = 0.5;
    pub const ALBUM: f64 = 0.2;
    pub const FEATURES: f64 = 0.5;
}

impl SimilarityStrategy for MusicSimilarity {
    fn weight(&self, a: &Item, b: &Item) -> f64 {
        let mut w = 0.0;
        if a.genre == b.genre {
            w += Self::GENRE;
        }
        if same_credit(&a.artist, &b.artist) {
            w += Self::ARTIST;
        }
        let same_album = matches!(
            (a.album.as_deref(), b.album.as_deref()),
            (Some(x), Some(y)) if !x.is_empty() && x == y
        );
        if same_album {
            w += Self::ALBUM;
        }
        w + Self::FEATURES * cosine_similarity(&a.features, &b.features)
    }

    // Music contributions span a wider range, so the bar is stricter
    fn threshold(&self) -> f64 {
        0.15
    }
}

/// Turns a catalog into a similarity graph
///
/// Ranking and grouping only read the resulting graph, so a builder backed by
/// blocking or approximate neighbour search can replace the pairwise one.
pub trait GraphBuilder {
    fn build(&self, items: &[Item]) -> SimilarityGraph;
}

/// Compares every unordered pair of items: O(n²) comparisons
pub struct PairwiseGraphBuilder<S> {
    strategy: S,
}

impl<S: SimilarityStrategy> PairwiseGraphBuilder<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }
}

impl<S: SimilarityStrategy> GraphBuilder for PairwiseGraphBuilder<S> {
    fn build(&self, items: &[Item]) -> SimilarityGraph {
        let mut graph = SimilarityGraph::new();
        for item in items {
            graph.add_node(&item.id);
        }

        let threshold = self.strategy.threshold();
        let mut compared = 0usize;
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                if a.id == b.id {
                    continue;
                }
                compared += 1;
                let weight = self.strategy.weight(a, b).clamp(0.0, 1.0);
                if weight > threshold {
                    graph.add_edge(&a.id, &b.id, weight);
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            pairs_compared = compared,
            threshold,
            "Similarity graph built"
        );

        graph
    }
}

/// Builds the graph for one catalog using that catalog's weighting rules.
///
/// The items are handed back unchanged.
pub fn build_graph(kind: CatalogKind, items: Vec<Item>) -> (SimilarityGraph, Vec<Item>) {
    let graph = match kind {
        CatalogKind::Movies => PairwiseGraphBuilder::new(MovieSimilarity).build(&items),
        CatalogKind::Music => PairwiseGraphBuilder::new(MusicSimilarity).build(&items),
    };
    (graph, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cosine_identical() {
        let a = features(&[("dark", 0.8), ("action", 0.4)]);
        assert!(approx(cosine_similarity(&a, &a), 1.0));
    }

    #[test]
    fn test_cosine_uses_only_shared_keys() {
        // restricted to "dark": (0.8) vs (0.2), parallel vectors
        let a = features(&[("dark", 0.8), ("action", 0.4)]);
        let b = features(&[("dark", 0.2), ("romance", 0.9)]);
        assert!(approx(cosine_similarity(&a, &b), 1.0));
    }

    #[test]
    fn test_cosine_no_shared_keys() {
        let a = features(&[("dark", 0.8)]);
        let b = features(&[("romance", 0.9)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_empty_and_zero_magnitude() {
        let a = features(&[("dark", 0.0), ("action", 0.0)]);
        let b = features(&[("dark", 1.0), ("action", 2.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&BTreeMap::new(), &b), 0.0);
    }

    #[test]
    fn test_cosine_orthogonal_on_shared_keys() {
        let a = features(&[("x", 1.0), ("y", 0.0)]);
        let b = features(&[("x", 0.0), ("y", 1.0)]);
        assert!(approx(cosine_similarity(&a, &b), 0.0));
    }

    #[test]
    fn test_movie_weight_components() {
        let a = Item::new("a", "A", "Sci-Fi")
            .with_director("Nolan")
            .with_actors(["X"]);
        let b = Item::new("b", "B", "Sci-Fi")
            .with_director("Nolan")
            .with_actors(["X", "Y"]);
        let c = Item::new("c", "C", "Drama").with_director("Villeneuve");

        assert!(approx(MovieSimilarity.weight(&a, &b), 0.2 + 0.4 + 0.3));
        assert!(approx(MovieSimilarity.weight(&a, &c), 0.0));
    }

    #[test]
    fn test_missing_directors_do_not_match() {
        let a = Item::new("a", "A", "Sci-Fi");
        let b = Item::new("b", "B", "Drama");
        assert_eq!(MovieSimilarity.weight(&a, &b), 0.0);
    }

    #[test]
    fn test_movie_graph_is_clamped_and_symmetric() {
        let items = vec![
            Item::new("a", "A", "Sci-Fi")
                .with_director("Nolan")
                .with_actors(["X"])
                .with_feature("dark", 0.9),
            Item::new("b", "B", "Sci-Fi")
                .with_director("Nolan")
                .with_actors(["X"])
                .with_feature("dark", 0.5),
            Item::new("c", "C", "Comedy").with_director("Wright"),
        ];

        let (graph, items) = build_graph(CatalogKind::Movies, items);

        // 0.2 + 0.4 + 0.3 + 0.3 = 1.2, clamped
        assert_eq!(graph.weight("a", "b"), Some(1.0));
        assert_eq!(graph.weight("b", "a"), Some(1.0));
        // nothing in common: isolated but still a node
        assert!(graph.contains("c"));
        assert_eq!(graph.neighbors("c").count(), 0);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_movie_any_positive_weight_creates_edge() {
        let items = vec![
            Item::new("a", "A", "Drama").with_feature("calm", 0.1),
            Item::new("b", "B", "Comedy").with_feature("calm", 0.9),
        ];
        let (graph, _) = build_graph(CatalogKind::Movies, items);
        let w = graph.weight("a", "b").unwrap();
        assert!(approx(w, 0.3));
    }

    #[test]
    fn test_music_genre_only_creates_edge() {
        let items = vec![
            Item::new("s1", "One", "Jazz").with_artist("Miles"),
            Item::new("s2", "Two", "Jazz").with_artist("Coltrane"),
        ];
        let (graph, _) = build_graph(CatalogKind::Music, items);
        let w = graph.weight("s1", "s2").unwrap();
        assert!(approx(w, 0.2));
    }

    #[test]
    fn test_music_nothing_shared_creates_no_edge() {
        let items = vec![
            Item::new("s1", "One", "Jazz").with_artist("Miles"),
            Item::new("s2", "Two", "Metal").with_artist("Slayer"),
        ];
        let (graph, _) = build_graph(CatalogKind::Music, items);
        assert_eq!(graph.weight("s1", "s2"), None);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_music_below_threshold_creates_no_edge() {
        // 0.5 * 0.2 cosine contribution = 0.1, under the 0.15 bar
        let mut a = Item::new("s1", "One", "Jazz");
        a.features = features(&[("x", 1.0), ("y", 0.0)]);
        let mut b = Item::new("s2", "Two", "Metal");
        b.features = features(&[("x", 0.2), ("y", 0.9797958971132712)]);

        let raw = MusicSimilarity.weight(&a, &b);
        assert!(raw > 0.0 && raw < 0.15);

        let (graph, _) = build_graph(CatalogKind::Music, vec![a, b]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_music_album_requires_non_empty_match() {
        let a = Item::new("s1", "One", "Pop").with_album("");
        let b = Item::new("s2", "Two", "Rock").with_album("");
        assert_eq!(MusicSimilarity.weight(&a, &b), 0.0);

        let a = Item::new("s1", "One", "Pop").with_album("25");
        let b = Item::new("s2", "Two", "Rock").with_album("25");
        assert!(approx(MusicSimilarity.weight(&a, &b), 0.2));
    }

    #[test]
    fn test_music_same_artist_and_genre() {
        let a = Item::new("s1", "One", "Pop").with_artist("Adele");
        let b = Item::new("s2", "Two", "Pop").with_artist("Adele");
        let (graph, _) = build_graph(CatalogKind::Music, vec![a, b]);
        assert!(approx(graph.weight("s1", "s2").unwrap(), 0.7));
    }

    #[test]
    fn test_graph_symmetry_over_catalog() {
        let items: Vec<Item> = (0..6)
            .map(|i| {
                Item::new(format!("m{}", i), "T", if i % 2 == 0 { "Drama" } else { "Comedy" })
                    .with_director(if i < 3 { "A" } else { "B" })
                    .with_feature("f", i as f64)
            })
            .collect();
        let (graph, items) = build_graph(CatalogKind::Movies, items);

        for u in &items {
            for v in &items {
                assert_eq!(graph.weight(&u.id, &v.id), graph.weight(&v.id, &u.id));
            }
            assert_eq!(graph.weight(&u.id, &u.id), None);
        }
    }
}
