use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{
    AccountResponse, LoginRequest, SignupRequest, Subject, TokenResponse,
};
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;

use crate::services::AccountService;

#[axum::debug_handler]
pub async fn signup(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let service = AccountService::new(&config);

    let account = service.signup(request).await?;

    Ok(Json(AccountResponse::from(&account)))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Login attempt for {}", request.email);

    let service = AccountService::new(&config);
    let account = service.authenticate(&request.email, &request.password).await?;

    let token = issue_token(&account.email, &config.jwt_secret)
        .map_err(AppError::Internal)?;

    Ok(Json(TokenResponse::bearer(token)))
}

#[axum::debug_handler]
pub async fn me(
    Extension(subject): Extension<Subject>,
) -> Json<Subject> {
    Json(subject)
}
