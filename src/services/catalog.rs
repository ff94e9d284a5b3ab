use std::path::PathBuf;
use std::time::Instant;

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{CatalogKind, Item},
};

use super::ranker::Recommender;

/// Where catalog records come from
///
/// The engine only needs an ordered list of items; storage and format are
/// up to the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every item of the given catalog, in catalog order
    async fn load_items(&self, kind: CatalogKind) -> AppResult<Vec<Item>>;
}

/// Reads a JSON array of item records from a file
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonFileCatalog {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_items(&self, kind: CatalogKind) -> AppResult<Vec<Item>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let items: Vec<Item> = serde_json::from_str(&raw)?;
        tracing::debug!(%kind, count = items.len(), "Catalog records decoded");
        Ok(items)
    }
}

/// Loads a catalog and builds its similarity graph.
///
/// This is the one write phase of a catalog; the returned recommender is
/// only ever read afterwards.
pub async fn load_recommender(
    source: &dyn CatalogSource,
    kind: CatalogKind,
) -> AppResult<Recommender> {
    let start = Instant::now();
    let items = source.load_items(kind).await?;
    let recommender = Recommender::new(kind, items);

    tracing::info!(
        %kind,
        items = recommender.items().len(),
        edges = recommender.graph().edge_count(),
        build_time_ms = start.elapsed().as_millis(),
        "Catalog loaded"
    );

    Ok(recommender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::io::Write;

    #[test]
    fn test_load_recommender_builds_graph() {
        let mut source = MockCatalogSource::new();
        source
            .expect_load_items()
            .withf(|kind| *kind == CatalogKind::Music)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    Item::new("s1", "One", "Pop").with_artist("Adele"),
                    Item::new("s2", "Two", "Pop").with_artist("Adele"),
                ])
            });

        let rec = tokio_test::block_on(load_recommender(&source, CatalogKind::Music)).unwrap();
        assert_eq!(rec.kind(), CatalogKind::Music);
        assert_eq!(rec.items().len(), 2);
        assert_eq!(rec.graph().edge_count(), 1);
    }

    #[test]
    fn test_load_recommender_propagates_errors() {
        let mut source = MockCatalogSource::new();
        source
            .expect_load_items()
            .returning(|_| Err(AppError::Internal("storage offline".to_string())));

        let result = tokio_test::block_on(load_recommender(&source, CatalogKind::Movies));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_json_file_catalog_reads_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "m1", "title": "Inception", "genre": "Sci-Fi",
                  "rating": 8.8, "director": "Christopher Nolan"}},
                {{"id": "m2", "title": "Tenet", "genre": "Sci-Fi",
                  "rating": 7.3, "director": "Christopher Nolan"}}
            ]"#
        )
        .unwrap();

        let source = JsonFileCatalog::new(file.path());
        assert!(source.exists());
        let items = source.load_items(CatalogKind::Movies).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, "m2");
    }

    #[tokio::test]
    async fn test_json_file_catalog_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "an array"}}"#).unwrap();

        let source = JsonFileCatalog::new(file.path());
        let result = source.load_items(CatalogKind::Movies).await;
        assert!(matches!(result, Err(AppError::CatalogFormat(_))));
    }

    #[tokio::test]
    async fn test_json_file_catalog_missing_file() {
        let source = JsonFileCatalog::new("/definitely/not/here.json");
        assert!(!source.exists());
        let result = source.load_items(CatalogKind::Music).await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
