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

use crate::models::{CreatePatientRequest, ListPatientsQuery, Patient, UpdatePatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk])?;

    let service = PatientService::new(&config);
    let patient = service.create_patient(request, auth.token()).await?;

    Ok((StatusCode::CREATED, Json(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Patient>, AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk, Role::Clinician])?;

    let service = PatientService::new(&config);
    let patient = service.get_patient(patient_id, auth.token()).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<Vec<Patient>>, AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk, Role::Clinician])?;

    let service = PatientService::new(&config);
    let patients = service
        .list_patients(query.active.unwrap_or(true), auth.token())
        .await?;

    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk])?;

    let service = PatientService::new(&config);
    let patient = service.update_patient(patient_id, request, auth.token()).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn deactivate_patient(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(patient_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    authorize(subject, &[Role::Admin])?;

    let service = PatientService::new(&config);
    service.deactivate_patient(patient_id, auth.token()).await?;

    Ok(StatusCode::NO_CONTENT)
}
