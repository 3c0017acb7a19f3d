pub mod postgrest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use patient_cell::models::Patient;
use professional_cell::models::Professional;

use crate::models::{Appointment, AppointmentSearchQuery, AppointmentStatus, ScheduleError};

pub use postgrest::PostgrestStore;

/// Persistence collaborator for the scheduling engine. The store is the
/// single point of truth and serialization: `insert_appointment` must
/// reject, atomically at write time, a second scheduled appointment for
/// the same (professional, scheduled_at) with `ScheduleError::Conflict`.
#[async_trait]
pub trait SchedulingStore: Send + Sync {
    async fn find_patient(&self, id: Uuid) -> Result<Option<Patient>, ScheduleError>;

    async fn find_professional(&self, id: Uuid) -> Result<Option<Professional>, ScheduleError>;

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, ScheduleError>;

    /// Scheduled appointment for the exact (professional, date-time)
    /// pair, if any. Cancelled and completed rows never conflict.
    async fn find_conflicting(
        &self,
        professional_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, ScheduleError>;

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<Appointment, ScheduleError>;

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ScheduleError>;

    /// Exact-match conjunction of the supplied filters, id ascending.
    async fn query_appointments(
        &self,
        query: &AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, ScheduleError>;
}
