pub mod catalog;
pub mod graph;
pub mod grouper;
pub mod ranker;
pub mod scorer;
pub mod similarity;

pub use catalog::{load_recommender, CatalogSource, JsonFileCatalog};
pub use graph::SimilarityGraph;
pub use grouper::{classify, Bucket, Classification, MatchFlags};
pub use ranker::{Recommender, DEFAULT_TOP_K};
pub use scorer::score_item;
pub use similarity::{
    build_graph, cosine_similarity, GraphBuilder, MovieSimilarity, MusicSimilarity,
    PairwiseGraphBuilder, SimilarityStrategy,
};
