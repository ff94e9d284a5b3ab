use std::collections::HashMap;

/// Undirected weighted graph over item identifiers
///
/// Edge weights are symmetric by construction: the only way to add an edge
/// writes both directions at once, and that method is crate-private so only
/// the graph builder can call it.
#[derive(Debug, Clone, Default)]
pub struct SimilarityGraph {
    adj: HashMap<String, HashMap<String, f64>>,
}

impl SimilarityGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node with no edges. No-op if it already exists.
    pub fn add_node(&mut self, id: &str) {
        if !self.adj.contains_key(id) {
            self.adj.insert(id.to_string(), HashMap::new());
        }
    }

    /// Sets the weight of the undirected edge u <-> v, overwriting any prior weight.
    ///
    /// Both endpoints are registered if absent. A self-loop only registers the node.
    pub(crate) fn add_edge(&mut self, u: &str, v: &str, weight: f64) {
        self.add_node(u);
        self.add_node(v);
        if u == v {
            return;
        }
        if let Some(edges) = self.adj.get_mut(u) {
            edges.insert(v.to_string(), weight);
        }
        if let Some(edges) = self.adj.get_mut(v) {
            edges.insert(u.to_string(), weight);
        }
    }

    /// Returns (neighbor, weight) pairs for `id`, empty if the node is unknown
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.adj
            .get(id)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(n, w)| (n.as_str(), *w)))
    }

    /// Weight of the edge between `u` and `v`, if any
    pub fn weight(&self, u: &str, v: &str) -> Option<f64> {
        self.adj.get(u).and_then(|edges| edges.get(v)).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adj.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adj.keys().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adj.values().map(|edges| edges.len()).sum::<usize>() / 2
    }

    /// Every undirected edge exactly once, as (smaller id, larger id, weight)
    pub fn edges(&self) -> Vec<(&str, &str, f64)> {
        let mut edges: Vec<(&str, &str, f64)> = self
            .adj
            .iter()
            .flat_map(|(u, nbrs)| {
                nbrs.iter()
                    .filter(move |(v, _)| u.as_str() < v.as_str())
                    .map(move |(v, w)| (u.as_str(), v.as_str(), *w))
            })
            .collect();
        edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        edges
    }
}
