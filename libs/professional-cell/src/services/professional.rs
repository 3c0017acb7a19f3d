use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_models::error::AppError;

use crate::models::{CreateProfessionalRequest, Professional, UpdateProfessionalRequest};

pub struct ProfessionalService {
    supabase: SupabaseClient,
}

impl ProfessionalService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_professional(
        &self,
        request: CreateProfessionalRequest,
        auth_token: &str,
    ) -> Result<Professional, AppError> {
        debug!("Creating professional record: {}", request.registration_number);

        let professional_data = json!({
            "id": Uuid::new_v4(),
            "full_name": request.full_name,
            "registration_number": request.registration_number,
            "specialty": request.specialty,
            "email": request.email,
            "phone_number": request.phone_number,
            "active": true,
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let mut result: Vec<Professional> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/professionals",
                Some(auth_token),
                Some(professional_data),
                Some(headers),
            )
            .await?;

        if result.is_empty() {
            return Err(AppError::Internal("Failed to create professional record".to_string()));
        }

        let professional = result.remove(0);
        debug!("Professional record created with ID: {}", professional.id);
        Ok(professional)
    }

    pub async fn get_professional(
        &self,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<Professional, AppError> {
        let path = format!("/rest/v1/professionals?id=eq.{}", professional_id);
        let mut result: Vec<Professional> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        if result.is_empty() {
            return Err(AppError::NotFound("Professional not found".to_string()));
        }

        Ok(result.remove(0))
    }

    pub async fn list_professionals(
        &self,
        active: bool,
        auth_token: &str,
    ) -> Result<Vec<Professional>, AppError> {
        let path = format!("/rest/v1/professionals?active=eq.{}&order=full_name.asc", active);
        let professionals: Vec<Professional> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(professionals)
    }

    pub async fn update_professional(
        &self,
        professional_id: Uuid,
        request: UpdateProfessionalRequest,
        auth_token: &str,
    ) -> Result<Professional, AppError> {
        debug!("Updating professional record: {}", professional_id);

        let mut update_data = serde_json::Map::new();

        if let Some(full_name) = request.full_name {
            update_data.insert("full_name".to_string(), json!(full_name));
        }
        if let Some(registration_number) = request.registration_number {
            update_data.insert("registration_number".to_string(), json!(registration_number));
        }
        if let Some(specialty) = request.specialty {
            update_data.insert("specialty".to_string(), json!(specialty));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone_number) = request.phone_number {
            update_data.insert("phone_number".to_string(), json!(phone_number));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let path = format!("/rest/v1/professionals?id=eq.{}", professional_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let mut result: Vec<Professional> = self
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
            return Err(AppError::NotFound("Professional not found".to_string()));
        }

        Ok(result.remove(0))
    }

    /// Soft-delete. Existing appointments keep their reference.
    pub async fn deactivate_professional(
        &self,
        professional_id: Uuid,
        auth_token: &str,
    ) -> Result<(), AppError> {
        debug!("Deactivating professional record: {}", professional_id);

        let path = format!("/rest/v1/professionals?id=eq.{}", professional_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let update = json!({
            "active": false,
            "updated_at": Utc::now().to_rfc3339()
        });

        let result: Vec<Professional> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(update), Some(headers))
            .await?;

        if result.is_empty() {
            return Err(AppError::NotFound("Professional not found".to_string()));
        }

        Ok(())
    }
}
