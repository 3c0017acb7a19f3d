use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn professional_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(create_professional))
        .route("/", get(list_professionals))
        .route("/{id}", get(get_professional))
        .route("/{id}", put(update_professional))
        .route("/{id}", delete(deactivate_professional))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
