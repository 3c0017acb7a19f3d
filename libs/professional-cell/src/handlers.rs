use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, Subject};
use shared_models::error::AppError;
use shared_utils::policy::authorize;

use crate::models::{
    CreateProfessionalRequest, ListProfessionalsQuery, Professional, UpdateProfessionalRequest,
};
use crate::services::ProfessionalService;

#[axum::debug_handler]
pub async fn create_professional(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Json(request): Json<CreateProfessionalRequest>,
) -> Result<(StatusCode, Json<Professional>), AppError> {
    authorize(subject, &[Role::Admin])?;

    let service = ProfessionalService::new(&config);
    let professional = service.create_professional(request, auth.token()).await?;

    Ok((StatusCode::CREATED, Json(professional)))
}

#[axum::debug_handler]
pub async fn get_professional(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(professional_id): Path<Uuid>,
) -> Result<Json<Professional>, AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk, Role::Clinician])?;

    let service = ProfessionalService::new(&config);
    let professional = service.get_professional(professional_id, auth.token()).await?;

    Ok(Json(professional))
}

#[axum::debug_handler]
pub async fn list_professionals(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Query(query): Query<ListProfessionalsQuery>,
) -> Result<Json<Vec<Professional>>, AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk, Role::Clinician])?;

    let service = ProfessionalService::new(&config);
    let professionals = service
        .list_professionals(query.active.unwrap_or(true), auth.token())
        .await?;

    Ok(Json(professionals))
}

#[axum::debug_handler]
pub async fn update_professional(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(professional_id): Path<Uuid>,
    Json(request): Json<UpdateProfessionalRequest>,
) -> Result<Json<Professional>, AppError> {
    authorize(subject, &[Role::Admin])?;

    let service = ProfessionalService::new(&config);
    let professional = service
        .update_professional(professional_id, request, auth.token())
        .await?;

    Ok(Json(professional))
}

#[axum::debug_handler]
pub async fn deactivate_professional(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(professional_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    authorize(subject, &[Role::Admin])?;

    let service = ProfessionalService::new(&config);
    service
        .deactivate_professional(professional_id, auth.token())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
