use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use patient_cell::models::Patient;
use professional_cell::models::Professional;
use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{Appointment, AppointmentSearchQuery, AppointmentStatus, ScheduleError};

use super::SchedulingStore;

/// REST-backed store. Conflict atomicity rides on a partial unique index
/// on (professional_id, scheduled_at) where status = 'scheduled'; the
/// losing concurrent insert comes back as HTTP 409 and surfaces as
/// `ScheduleError::Conflict`.
pub struct PostgrestStore {
    supabase: SupabaseClient,
    auth_token: String,
}

impl PostgrestStore {
    pub fn new(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: auth_token.to_string(),
        }
    }
}

#[async_trait]
impl SchedulingStore for PostgrestStore {
    async fn find_patient(&self, id: Uuid) -> Result<Option<Patient>, ScheduleError> {
        let path = format!("/rest/v1/patients?id=eq.{}", id);
        let mut result: Vec<Patient> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;

        if result.is_empty() {
            return Ok(None);
        }
        Ok(Some(result.remove(0)))
    }

    async fn find_professional(&self, id: Uuid) -> Result<Option<Professional>, ScheduleError> {
        let path = format!("/rest/v1/professionals?id=eq.{}", id);
        let mut result: Vec<Professional> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;

        if result.is_empty() {
            return Ok(None);
        }
        Ok(Some(result.remove(0)))
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, ScheduleError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let mut result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;

        if result.is_empty() {
            return Ok(None);
        }
        Ok(Some(result.remove(0)))
    }

    async fn find_conflicting(
        &self,
        professional_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, ScheduleError> {
        let path = format!(
            "/rest/v1/appointments?professional_id=eq.{}&scheduled_at=eq.{}&status=eq.scheduled&limit=1",
            professional_id,
            urlencoding::encode(&scheduled_at.to_rfc3339()),
        );

        let mut result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;

        if result.is_empty() {
            return Ok(None);
        }
        Ok(Some(result.remove(0)))
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<Appointment, ScheduleError> {
        debug!(
            "Inserting appointment for professional {} at {}",
            appointment.professional_id, appointment.scheduled_at
        );

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let body = serde_json::to_value(appointment)
            .map_err(|e| ScheduleError::Storage(format!("Failed to encode appointment: {}", e)))?;

        let mut result: Vec<Appointment> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(&self.auth_token),
                Some(body),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(ScheduleError::Storage("Insert returned no representation".to_string()));
        }
        Ok(result.remove(0))
    }

    async fn update_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ScheduleError> {
        debug!("Updating appointment {} status to {}", id, status);

        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let body = serde_json::json!({ "status": status });

        let mut result: Vec<Appointment> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(&self.auth_token), Some(body), Some(headers))
            .await?;

        if result.is_empty() {
            return Err(ScheduleError::NotFound);
        }
        Ok(result.remove(0))
    }

    async fn query_appointments(
        &self,
        query: &AppointmentSearchQuery,
    ) -> Result<Vec<Appointment>, ScheduleError> {
        let mut query_parts = vec![];

        if let Some(patient_id) = query.patient_id {
            query_parts.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(professional_id) = query.professional_id {
            query_parts.push(format!("professional_id=eq.{}", professional_id));
        }
        if let Some(status) = query.status {
            query_parts.push(format!("status=eq.{}", status));
        }

        // id ascending keeps the listing stable across identical inputs
        query_parts.push("order=id.asc".to_string());

        let path = format!("/rest/v1/appointments?{}", query_parts.join("&"));

        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(&self.auth_token), None)
            .await?;

        Ok(appointments)
    }
}
