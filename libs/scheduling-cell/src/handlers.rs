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

use crate::models::{Appointment, AppointmentSearchQuery, ScheduleAppointmentRequest};
use crate::services::SchedulingService;
use crate::store::PostgrestStore;

fn service(config: &AppConfig, auth_token: &str) -> SchedulingService<PostgrestStore> {
    SchedulingService::new(PostgrestStore::new(config, auth_token))
}

#[axum::debug_handler]
pub async fn schedule_appointment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Json(request): Json<ScheduleAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk])?;

    let appointment = service(&config, auth.token()).schedule(request).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Query(query): Query<AppointmentSearchQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk, Role::Clinician])?;

    let appointments = service(&config, auth.token()).list(&query).await?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    authorize(subject, &[Role::Admin, Role::FrontDesk, Role::Clinician])?;

    let appointment = service(&config, auth.token()).cancel(appointment_id).await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(subject): Extension<Subject>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    authorize(subject, &[Role::Admin, Role::Clinician])?;

    let appointment = service(&config, auth.token()).complete(appointment_id).await?;

    Ok(Json(appointment))
}
