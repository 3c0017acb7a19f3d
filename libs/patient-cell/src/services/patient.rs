use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, Patient, UpdatePatientRequest};

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
        auth_token: &str,
    ) -> Result<Patient, AppError> {
        debug!("Creating patient record for CPF {}", request.cpf);

        // CPF uniqueness covers inactive records too, so no active filter
        let existing_check_path = format!("/rest/v1/patients?cpf=eq.{}", request.cpf);
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &existing_check_path, Some(auth_token), None)
            .await?;

        if !existing.is_empty() {
            return Err(AppError::Conflict("CPF already registered".to_string()));
        }

        let patient_data = json!({
            "id": Uuid::new_v4(),
            "full_name": request.full_name,
            "cpf": request.cpf,
            "date_of_birth": request.date_of_birth,
            "phone_number": request.phone_number,
            "email": request.email,
            "address": request.address,
            "clinical_summary": request.clinical_summary,
            "active": true,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let mut result: Vec<Patient> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/patients",
                Some(auth_token),
                Some(patient_data),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(AppError::Internal("Failed to create patient record".to_string()));
        }

        let patient = result.remove(0);
        debug!("Patient record created with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid, auth_token: &str) -> Result<Patient, AppError> {
        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let mut result: Vec<Patient> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if result.is_empty() {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        Ok(result.remove(0))
    }

    pub async fn list_patients(&self, active: bool, auth_token: &str) -> Result<Vec<Patient>, AppError> {
        let path = format!("/rest/v1/patients?active=eq.{}&order=full_name.asc", active);
        let patients: Vec<Patient> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(patients)
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
        auth_token: &str,
    ) -> Result<Patient, AppError> {
        debug!("Updating patient record: {}", patient_id);

        let mut update_data = serde_json::Map::new();

        if let Some(full_name) = request.full_name {
            update_data.insert("full_name".to_string(), json!(full_name));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            update_data.insert("date_of_birth".to_string(), json!(date_of_birth));
        }
        if let Some(phone_number) = request.phone_number {
            update_data.insert("phone_number".to_string(), json!(phone_number));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(clinical_summary) = request.clinical_summary {
            update_data.insert("clinical_summary".to_string(), json!(clinical_summary));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let mut result: Vec<Patient> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        Ok(result.remove(0))
    }

    /// Soft-delete: flips the active flag, the row stays. Existing
    /// appointments referencing this patient are untouched.
    pub async fn deactivate_patient(&self, patient_id: Uuid, auth_token: &str) -> Result<(), AppError> {
        debug!("Deactivating patient record: {}", patient_id);

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let update = json!({
            "active": false,
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Patient> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(update), Some(headers))
            .await?;

        if result.is_empty() {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }

        Ok(())
    }
}
