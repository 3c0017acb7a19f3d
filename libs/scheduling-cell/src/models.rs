use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::error::AppError;

/// Appointment aggregate. References patient and professional by id, so
/// deactivating either leaves existing appointments untouched. No
/// duration is modeled; `scheduled_at` is the whole slot identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub professional_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Scheduled is the initial state; Cancelled and Completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAppointmentRequest {
    pub patient_id: Uuid,
    pub professional_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Optional exact-match filters combined as a conjunction. Omitted
/// filters are unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentSearchQuery {
    pub patient_id: Option<Uuid>,
    pub professional_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
}

/// Core scheduling taxonomy. Terminal for the current request; nothing
/// here is retried by the engine. `Storage` is the only kind a caller
/// may legitimately retry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    #[error("Appointment not found")]
    NotFound,

    #[error("{0}")]
    InvalidReference(String),

    #[error("Professional already has an appointment at this time")]
    Conflict,

    #[error("Appointment cannot be modified in current status: {0}")]
    InvalidTransition(AppointmentStatus),

    #[error("Cannot cancel an appointment that is already due or past")]
    PastAppointment,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<shared_database::DbError> for ScheduleError {
    fn from(e: shared_database::DbError) -> Self {
        use shared_database::DbError;
        match e {
            DbError::Conflict(_) => ScheduleError::Conflict,
            DbError::NotFound(msg) => ScheduleError::Storage(msg),
            DbError::Unavailable(msg) => ScheduleError::Storage(msg),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        match e {
            ScheduleError::NotFound => AppError::NotFound(e.to_string()),
            ScheduleError::InvalidReference(_) => AppError::InvalidReference(e.to_string()),
            ScheduleError::Conflict => AppError::SchedulingConflict(e.to_string()),
            ScheduleError::InvalidTransition(_) => AppError::InvalidTransition(e.to_string()),
            ScheduleError::PastAppointment => AppError::PastAppointment(e.to_string()),
            ScheduleError::Storage(_) => AppError::StorageUnavailable(e.to_string()),
        }
    }
}
