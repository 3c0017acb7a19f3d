use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use patient_cell::models::Patient;
use professional_cell::models::Professional;
use scheduling_cell::models::{
    Appointment, AppointmentSearchQuery, AppointmentStatus, ScheduleError,
};
use scheduling_cell::store::SchedulingStore;

#[derive(Default)]
struct Inner {
    patients: Mutex<Vec<Patient>>,
    professionals: Mutex<Vec<Professional>>,
    appointments: Mutex<Vec<Appointment>>,
}

/// In-memory store. The appointments mutex makes check-then-insert a
/// single critical section, so the double-booking guard holds under
/// concurrent schedulers just like the database unique index does.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patient(&self, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        let mut patients = self.inner.patients.lock().unwrap();
        let cpf = format!("{:011}", patients.len() + 1);
        patients.push(Patient {
            id,
            full_name: "Ana Souza".to_string(),
            cpf,
            date_of_birth: None,
            phone_number: None,
            email: None,
            address: None,
            clinical_summary: None,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    pub fn add_professional(&self, active: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.professionals.lock().unwrap().push(Professional {
            id,
            full_name: "Dr. Carlos Lima".to_string(),
            registration_number: format!("CRM-{}", id.simple()),
            specialty: Some("General Practice".to_string()),
            email: None,
            phone_number: None,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }

    pub fn appointment_count(&self) -> usize {
        self.inner.appointments.lock().unwrap().len()
    }
}

#[async_trait]
impl SchedulingStore for MemoryStore {
    async fn find_patient(&self, id: Uuid) -> Result<Option<Patient>, ScheduleError> {
        Ok(self
            .inner
            .patients
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_professional(&self, id: Uuid) -> Result<Option<Professional>, ScheduleError> {
        Ok(self
            .inner
            .professionals
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, ScheduleError> {
        Ok(self
            .inner
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_conflicting(
        &self,
        professional_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, ScheduleError> {
        Ok(self
            .inner
            .appointments
            .lock()
            .unwrap()
            .iter()
            .find(|a| {
                a.professional_id == professional_id
                    && a.scheduled_at == scheduled_at
                    && a.status == AppointmentStatus::Scheduled
            })
            .cloned())
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<Appointment, ScheduleError> {
        let mut appointments = self.inner.appointments.lock().unwrap();

        let taken = appointments.iter().any(|a| {
            a.professional_id == appointment.professional_id
                && a.scheduled_at == appointment.scheduled_at
                && a.status == AppointmentStatus::Scheduled
        });
        if taken {
            return Err(ScheduleError::Conflict);
        }

        appointments.push(appointment.clone());
        Ok(appointment.clone())
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ScheduleError> {
        let mut appointments = self.inner.appointments.lock().unwrap();

        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ScheduleError::NotFound)?;

        appointment.status = status;
        Ok(appointment.clone())
    }

    async fn query_appointments(
        &self,
        query: &AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, ScheduleError> {
        let mut matches: Vec<Appointment> = self
            .inner
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| query.patient_id.map(|id| a.patient_id == id).unwrap_or(true))
            .filter(|a| {
                query
                    .professional_id
                    .map(|id| a.professional_id == id)
                    .unwrap_or(true)
            })
            .filter(|a| query.status.map(|s| a.status == s).unwrap_or(true))
            .cloned()
            .collect();

        matches.sort_by_key(|a| a.id);
        Ok(matches)
    }
}
