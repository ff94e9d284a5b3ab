use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{CatalogKind, GroupedResult, Item, Preferences, RankedCandidate},
    services::score_item,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub kind: CatalogKind,
    pub items: usize,
    pub nodes: usize,
    pub edges: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EdgeResponse {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeResponse>,
}

#[derive(Debug, Serialize)]
pub struct NeighborResponse {
    pub id: String,
    pub title: String,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub item_id: String,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub item_id: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub seeds: Vec<String>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub ranked: Vec<RankedCandidate>,
    pub best: Vec<GroupedResult>,
    pub similar: Vec<GroupedResult>,
    pub hidden: Vec<GroupedResult>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List loaded catalogs
pub async fn list_catalogs(State(state): State<AppState>) -> Json<Vec<CatalogSummary>> {
    let summaries = state
        .inner
        .catalogs
        .values()
        .map(|catalog| {
            let rec = &catalog.recommender;
            CatalogSummary {
                kind: rec.kind(),
                items: rec.items().len(),
                nodes: rec.graph().node_count(),
                edges: rec.graph().edge_count(),
                loaded_at: catalog.loaded_at,
            }
        })
        .collect();
    Json(summaries)
}

/// All items of a catalog, in catalog order
pub async fn list_items(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<Vec<Item>>> {
    let catalog = state.catalog(&kind)?;
    Ok(Json(catalog.recommender.items().to_vec()))
}

/// The catalog's similarity graph as node and edge lists
pub async fn get_graph(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<GraphResponse>> {
    let graph = state.catalog(&kind)?.recommender.graph();

    let mut nodes: Vec<String> = graph.nodes().map(str::to_string).collect();
    nodes.sort();
    let edges = graph
        .edges()
        .into_iter()
        .map(|(source, target, weight)| EdgeResponse {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        })
        .collect();

    Ok(Json(GraphResponse { nodes, edges }))
}

/// Graph neighbors of one item, strongest first
pub async fn get_neighbors(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> AppResult<Json<Vec<NeighborResponse>>> {
    let rec = &state.catalog(&kind)?.recommender;
    if rec.get(&id).is_none() {
        return Err(AppError::NotFound(format!("Item '{}' in {}", id, rec.kind())));
    }

    let mut neighbors: Vec<NeighborResponse> = rec
        .graph()
        .neighbors(&id)
        .map(|(neighbor, weight)| NeighborResponse {
            id: neighbor.to_string(),
            title: rec.get(neighbor).map(|i| i.title.clone()).unwrap_or_default(),
            weight,
        })
        .collect();
    neighbors.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));

    Ok(Json(neighbors))
}

/// Preference score of a single item, without graph boosts
pub async fn score(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<ScoreRequest>,
) -> AppResult<Json<ScoreResponse>> {
    let rec = &state.catalog(&kind)?.recommender;
    let item = rec.get(&request.item_id).ok_or_else(|| {
        AppError::NotFound(format!("Item '{}' in {}", request.item_id, rec.kind()))
    })?;

    Ok(Json(ScoreResponse {
        item_id: request.item_id.clone(),
        score: score_item(item, &request.preferences),
    }))
}

/// Rank the catalog and split the result into groups
pub async fn recommend(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let rec = &state.catalog(&kind)?.recommender;
    let top_k = state.resolve_top_k(request.top_k)?;

    tracing::info!(
        request_id = %request_id,
        catalog = %rec.kind(),
        seed_count = request.seeds.len(),
        top_k,
        "Processing recommendation request"
    );

    let unknown: Vec<&str> = request
        .seeds
        .iter()
        .filter(|seed| !rec.graph().contains(seed))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        tracing::warn!(
            request_id = %request_id,
            seeds = ?unknown,
            "Seeds not in catalog contribute no boost"
        );
    }

    let ranked = rec.rank(&request.seeds, &request.preferences, top_k);
    let groups = rec.group_recommendations(&ranked, &request.preferences);

    tracing::info!(
        request_id = %request_id,
        ranked = ranked.len(),
        best = groups.best.len(),
        similar = groups.similar.len(),
        hidden = groups.hidden.len(),
        "Recommendation completed"
    );

    Ok(Json(RecommendationResponse {
        ranked,
        best: groups.best,
        similar: groups.similar,
        hidden: groups.hidden,
    }))
}
