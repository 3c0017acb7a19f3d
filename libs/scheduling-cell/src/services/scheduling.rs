use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentSearchQuery, AppointmentStatus, ScheduleAppointmentRequest,
    ScheduleError,
};
use crate::services::lifecycle::AppointmentLifecycle;
use crate::store::SchedulingStore;

/// The scheduling engine. Owns the appointment lifecycle; every
/// operation takes the store as an explicit collaborator and performs a
/// single request/response round, no retries.
pub struct SchedulingService<S: SchedulingStore> {
    store: S,
}

impl<S: SchedulingStore> SchedulingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an appointment in Scheduled state.
    ///
    /// Conflict detection is exact date-time equality for the
    /// professional: overlapping-but-unequal slots do not conflict,
    /// since no duration is modeled. Scheduling in the past is allowed;
    /// only cancellation checks pastness.
    pub async fn schedule(
        &self,
        request: ScheduleAppointmentRequest,
    ) -> Result<Appointment, ScheduleError> {
        debug!(
            "Scheduling appointment: patient {} with professional {} at {}",
            request.patient_id, request.professional_id, request.scheduled_at
        );

        let patient = self.store.find_patient(request.patient_id).await?;
        if !patient.map(|p| p.active).unwrap_or(false) {
            return Err(ScheduleError::InvalidReference(
                "Patient does not exist or is inactive".to_string(),
            ));
        }

        let professional = self.store.find_professional(request.professional_id).await?;
        if !professional.map(|p| p.active).unwrap_or(false) {
            return Err(ScheduleError::InvalidReference(
                "Professional does not exist or is inactive".to_string(),
            ));
        }

        // Advisory pre-check; the insert below is the authoritative,
        // atomic guard against two writers taking the same slot.
        if self
            .store
            .find_conflicting(request.professional_id, request.scheduled_at)
            .await?
            .is_some()
        {
            warn!(
                "Scheduling conflict for professional {} at {}",
                request.professional_id, request.scheduled_at
            );
            return Err(ScheduleError::Conflict);
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            professional_id: request.professional_id,
            scheduled_at: request.scheduled_at,
            status: AppointmentStatus::Scheduled,
            notes: request.notes,
            created_at: Utc::now(),
        };

        let created = self.store.insert_appointment(&appointment).await?;
        info!("Appointment {} scheduled", created.id);
        Ok(created)
    }

    /// Cancel a scheduled appointment. Refuses appointments already due
    /// or past; terminal appointments fail the transition check first.
    pub async fn cancel(&self, appointment_id: Uuid) -> Result<Appointment, ScheduleError> {
        let appointment = self
            .store
            .find_appointment(appointment_id)
            .await?
            .ok_or(ScheduleError::NotFound)?;

        AppointmentLifecycle::validate_transition(
            &appointment.status,
            &AppointmentStatus::Cancelled,
        )?;

        if appointment.scheduled_at <= Utc::now() {
            return Err(ScheduleError::PastAppointment);
        }

        let cancelled = self
            .store
            .update_appointment_status(appointment_id, AppointmentStatus::Cancelled)
            .await?;
        info!("Appointment {} cancelled", appointment_id);
        Ok(cancelled)
    }

    /// Mark a scheduled appointment as completed. No pastness guard:
    /// completion normally happens after the slot time.
    pub async fn complete(&self, appointment_id: Uuid) -> Result<Appointment, ScheduleError> {
        let appointment = self
            .store
            .find_appointment(appointment_id)
            .await?
            .ok_or(ScheduleError::NotFound)?;

        AppointmentLifecycle::validate_transition(
            &appointment.status,
            &AppointmentStatus::Completed,
        )?;

        let completed = self
            .store
            .update_appointment_status(appointment_id, AppointmentStatus::Completed)
            .await?;
        info!("Appointment {} completed", appointment_id);
        Ok(completed)
    }

    /// List appointments matching every supplied filter, id ascending.
    pub async fn list(
        &self,
        query: &AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, ScheduleError> {
        self.store.query_appointments(query).await
    }
}
