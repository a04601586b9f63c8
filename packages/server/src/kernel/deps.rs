//! Server dependencies for domain activities (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! activities. External services use trait abstractions so tests can swap in
//! fakes; the Everflow client is constructed once at process start and
//! injected here rather than living in a global.

use std::sync::Arc;

use sqlx::PgPool;

use crate::kernel::BaseEverflowService;

/// Server dependencies accessible to domain activities
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Everflow network API client used by the sync pipeline
    pub everflow: Arc<dyn BaseEverflowService>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(db_pool: PgPool, everflow: Arc<dyn BaseEverflowService>) -> Self {
        Self { db_pool, everflow }
    }
}
