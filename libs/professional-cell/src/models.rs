use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health professional record. `registration_number` is the professional
/// registry document (CRM, COREN and the like). Soft-delete only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professional {
    pub id: Uuid,
    pub full_name: String,
    pub registration_number: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfessionalRequest {
    pub full_name: String,
    pub registration_number: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfessionalRequest {
    pub full_name: Option<String>,
    pub registration_number: Option<String>,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProfessionalsQuery {
    pub active: Option<bool>,
}
