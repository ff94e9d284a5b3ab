use std::collections::{HashMap, HashSet};

use crate::models::{CatalogKind, Item, Preferences, RankedCandidate};

use super::graph::SimilarityGraph;
use super::scorer::score_item;
use super::similarity::build_graph;

/// How much of an edge weight a seed passes to each neighbor
const SEED_BOOST: f64 = 0.2;

pub const DEFAULT_TOP_K: usize = 50;

/// One catalog's items and similarity graph, built once and read-only afterwards
#[derive(Debug, Clone)]
pub struct Recommender {
    kind: CatalogKind,
    graph: SimilarityGraph,
    items: Vec<Item>,
    /// id -> position in `items`; for duplicate ids the last record wins
    index: HashMap<String, usize>,
}

impl Recommender {
    /// Builds the similarity graph for `items` using the catalog's weighting rules
    pub fn new(kind: CatalogKind, items: Vec<Item>) -> Self {
        let (graph, items) = build_graph(kind, items);
        Self::with_graph(kind, graph, items)
    }

    /// Wraps an already-built graph
    pub fn with_graph(kind: CatalogKind, graph: SimilarityGraph, items: Vec<Item>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.id.clone(), pos))
            .collect();
        Self {
            kind,
            graph,
            items,
            index,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn graph(&self) -> &SimilarityGraph {
        &self.graph
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|pos| &self.items[*pos])
    }

    /// Popularity used for tie-breaking; 0 for unknown ids
    pub(crate) fn popularity_of(&self, id: &str) -> f64 {
        self.get(id).map_or(0.0, |item| item.popularity().value())
    }

    /// Ranks the catalog for `prefs`, boosted by graph neighbors of `seeds`.
    ///
    /// Seeds never appear in the output. Ties on (score, popularity) keep
    /// catalog order. Unknown seeds contribute nothing.
    pub fn rank(
        &self,
        seeds: &[String],
        prefs: &Preferences,
        top_k: usize,
    ) -> Vec<RankedCandidate> {
        let mut order: Vec<String> = Vec::with_capacity(self.index.len());
        let mut scores: HashMap<String, f64> = HashMap::with_capacity(self.index.len());

        for (pos, item) in self.items.iter().enumerate() {
            if self.index.get(&item.id) != Some(&pos) {
                continue;
            }
            order.push(item.id.clone());
            scores.insert(item.id.clone(), score_item(item, prefs));
        }

        for seed in seeds {
            for (neighbor, weight) in self.graph.neighbors(seed) {
                match scores.get_mut(neighbor) {
                    Some(score) => *score += SEED_BOOST * weight,
                    None => {
                        order.push(neighbor.to_string());
                        scores.insert(neighbor.to_string(), SEED_BOOST * weight);
                    }
                }
            }
        }

        let excluded: HashSet<&str> = seeds.iter().map(String::as_str).collect();
        let mut ranked: Vec<RankedCandidate> = order
            .into_iter()
            .filter(|id| !excluded.contains(id.as_str()))
            .map(|id| {
                let score = scores.get(&id).copied().unwrap_or(0.0);
                RankedCandidate { id, score }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score.total_cmp(&a.score).then_with(|| {
                self.popularity_of(&b.id)
                    .total_cmp(&self.popularity_of(&a.id))
            })
        });
        ranked.truncate(top_k);
        ranked
    }
}
