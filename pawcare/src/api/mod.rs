mod advice;
pub mod auth;
mod bindings;
mod categories;
mod dogs;
mod middleware;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use axum::extract::FromRef;
use tokio::sync::RwLock;
use tracing::info;

use crate::binding::{BindingRegistry, ConfigurationError, Resolver};
use crate::store::DogStore;
use auth::UserDirectory;
use middleware::auth_middleware;

#[derive(Clone)]
pub(crate) struct AppState {
    store: Arc<RwLock<DogStore>>,
    users: Arc<UserDirectory>,
    resolver: Resolver,
}

impl AppState {
    #[must_use]
    pub fn new(store: DogStore, users: UserDirectory, resolver: Resolver) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            users: Arc::new(users),
            resolver,
        }
    }
}

impl FromRef<AppState> for Resolver {
    fn from_ref(state: &AppState) -> Self {
        state.resolver.clone()
    }
}

/// Builds the binding registry, checks every bound parameter has a descriptor,
/// then assembles the authenticated router.
pub fn create_router(store: DogStore, users: UserDirectory) -> Result<Router, ConfigurationError> {
    let registry = BindingRegistry::build(bindings::declarations())?;
    for parameter in bindings::REQUIRED {
        registry.require(parameter)?;
    }
    info!(descriptors = registry.len(), "binding registry ready");

    let state = AppState::new(store, users, Resolver::new(registry));

    Ok(Router::new()
        .merge(dogs::router())
        .merge(advice::router())
        .merge(categories::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state))
}
