use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Patient record. `cpf` is the national identifier and is unique among
/// all patients, active or not. Records are deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub cpf: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub clinical_summary: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub full_name: String,
    pub cpf: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub clinical_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub clinical_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPatientsQuery {
    pub active: Option<bool>,
}
