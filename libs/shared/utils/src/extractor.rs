use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};
use shared_models::auth::Subject;
use shared_models::error::AppError;

use crate::jwt::verify_token;

fn bearer_token(request: &Request<Body>) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Unauthenticated("Invalid authorization header format".to_string()));
    }

    Ok(&auth_value[7..])
}

/// Authentication middleware: verifies the bearer token, resolves the
/// embedded identifier against the identity store, and rejects inactive
/// accounts. On success the `Subject` lands in request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;

    let claims = verify_token(token, &config.jwt_secret)
        .map_err(AppError::Unauthenticated)?;

    let client = SupabaseClient::new(&config);
    let account = client
        .find_account(&claims.sub)
        .await
        .map_err(|e| match e {
            DbError::Unavailable(msg) => AppError::StorageUnavailable(msg),
            other => AppError::StorageUnavailable(other.to_string()),
        })?
        .ok_or_else(|| AppError::Unauthenticated("Unknown subject".to_string()))?;

    if !account.active {
        return Err(AppError::Unauthenticated("Account is deactivated".to_string()));
    }

    debug!("Authenticated {} as {}", account.email, account.role);
    request.extensions_mut().insert(account.to_subject());

    Ok(next.run(request).await)
}

/// Pull the authenticated subject out of request extensions.
pub fn extract_subject<B>(request: &Request<B>) -> Result<Subject, AppError> {
    request
        .extensions()
        .get::<Subject>()
        .cloned()
        .ok_or_else(|| AppError::Unauthenticated("Subject not found in request extensions".to_string()))
}
