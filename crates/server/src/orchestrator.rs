//! # Recommendation Orchestrator
//!
//! Serves queries against the current [`CatalogSession`] and swaps in a new
//! session when the catalog is reloaded:
//! 1. Take a snapshot (`Arc`) of the current session under a short read lock
//! 2. Answer the query from the snapshot without holding any lock
//! 3. On reload, build the new session off-lock, then replace the snapshot
//!    under a single write lock
//!
//! Queries that started before a reload finish against the session they
//! began with.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{info, warn};

use data_loader::Catalog;

use crate::error::RecommendError;
use crate::session::{CatalogSession, QueryResult, RecommenderConfig};

/// Shared entry point for recommendation queries
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    session: Arc<RwLock<Arc<CatalogSession>>>,
}

impl RecommendationOrchestrator {
    /// Build a session for `catalog` with default configuration
    pub fn new(catalog: Catalog) -> Result<Self, RecommendError> {
        Self::with_config(catalog, RecommenderConfig::default())
    }

    pub fn with_config(
        catalog: Catalog,
        config: RecommenderConfig,
    ) -> Result<Self, RecommendError> {
        Ok(Self::from_session(CatalogSession::with_config(catalog, config)?))
    }

    pub fn from_session(session: CatalogSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(Arc::new(session))),
        }
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Arc<CatalogSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Main entry point: recommend up to `k` movies similar to `title`.
    pub fn recommend(&self, title: &str, k: usize) -> Result<QueryResult, RecommendError> {
        let start_time = Instant::now();
        let session = self.session();

        let result = session.recommend(title, k);
        match &result {
            Ok(r) => info!(
                "Recommended {} movies for {:?} in {:.2?}",
                r.recommendations.len(),
                r.base.title,
                start_time.elapsed()
            ),
            Err(e) => warn!("Query {:?} failed: {}", title, e),
        }
        result
    }

    /// Recommend using the session's configured default count
    pub fn recommend_default(&self, title: &str) -> Result<QueryResult, RecommendError> {
        let k = self.session().config().default_k;
        self.recommend(title, k)
    }

    /// Replace the catalog, keeping the current configuration.
    ///
    /// The new feature space is built before the swap, so readers never see
    /// a half-built session. On error the old session stays in place.
    pub fn reload(&self, catalog: Catalog) -> Result<(), RecommendError> {
        let config = self.session().config().clone();
        let fresh = Arc::new(CatalogSession::with_config(catalog, config)?);

        let mut current = self.session.write().unwrap_or_else(PoisonError::into_inner);
        info!(
            "Reloaded catalog: {} -> {} movies",
            current.catalog().len(),
            fresh.catalog().len()
        );
        *current = fresh;
        Ok(())
    }
}
