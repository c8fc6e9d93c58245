use std::sync::Arc;

use crate::{config::Config, models::catalog::Catalog, store::SharedSessionStore};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: SharedSessionStore,
    pub config: Config,
}

impl AppState {
    pub fn new(catalog: Catalog, sessions: SharedSessionStore, config: Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sessions,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<Catalog> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for SharedSessionStore {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
