use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::CatalogKind,
    services::{load_recommender, JsonFileCatalog, Recommender, DEFAULT_TOP_K},
};

/// Shared application state
///
/// Catalogs are fully built before the state is handed to the router and are
/// never written afterwards, so requests read them without locking.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// A built catalog and when it was loaded
pub struct LoadedCatalog {
    pub recommender: Recommender,
    pub loaded_at: DateTime<Utc>,
}

pub struct AppStateInner {
    pub catalogs: BTreeMap<CatalogKind, LoadedCatalog>,
    pub default_top_k: usize,
    pub max_top_k: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl AppState {
    /// Creates state over already-built catalogs with default ranking limits
    pub fn new(catalogs: Vec<Recommender>) -> Self {
        Self::with_limits(catalogs, DEFAULT_TOP_K, 500)
    }

    pub fn with_limits(catalogs: Vec<Recommender>, default_top_k: usize, max_top_k: usize) -> Self {
        let loaded_at = Utc::now();
        let catalogs = catalogs
            .into_iter()
            .map(|recommender| {
                (
                    recommender.kind(),
                    LoadedCatalog {
                        recommender,
                        loaded_at,
                    },
                )
            })
            .collect();

        Self {
            inner: Arc::new(AppStateInner {
                catalogs,
                default_top_k,
                max_top_k,
            }),
        }
    }

    /// Loads every configured catalog file that exists.
    ///
    /// Missing files are skipped with a warning; unreadable or malformed files fail.
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let mut catalogs = Vec::new();

        for (kind, path) in [
            (CatalogKind::Movies, &config.movies_path),
            (CatalogKind::Music, &config.music_path),
        ] {
            let source = JsonFileCatalog::new(path);
            if !source.exists() {
                tracing::warn!(%kind, path = %path, "Catalog file not found, skipping");
                continue;
            }
            catalogs.push(load_recommender(&source, kind).await?);
        }

        Ok(Self::with_limits(
            catalogs,
            config.default_top_k,
            config.max_top_k,
        ))
    }

    /// Looks up a loaded catalog by its path segment (`movies` / `music`)
    pub fn catalog(&self, kind: &str) -> AppResult<&LoadedCatalog> {
        let kind: CatalogKind = kind.parse()?;
        self.inner
            .catalogs
            .get(&kind)
            .ok_or_else(|| AppError::CatalogNotLoaded(kind.to_string()))
    }

    /// Resolves the requested list length against the configured limits
    pub fn resolve_top_k(&self, requested: Option<usize>) -> AppResult<usize> {
        let top_k = requested.unwrap_or(self.inner.default_top_k);
        if top_k == 0 || top_k > self.inner.max_top_k {
            return Err(AppError::InvalidInput(format!(
                "top_k must be between 1 and {}, got {}",
                self.inner.max_top_k, top_k
            )));
        }
        Ok(top_k)
    }
}
