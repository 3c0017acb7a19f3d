use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, Subject};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestAccount {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl TestAccount {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
        }
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn clinician(email: &str) -> Self {
        Self::new(email, Role::Clinician)
    }

    pub fn front_desk(email: &str) -> Self {
        Self::new(email, Role::FrontDesk)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn to_subject(&self) -> Subject {
        Subject {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            active: true,
        }
    }

    /// Identity-store row as the REST store would return it.
    pub fn to_account_row(&self, password_hash: &str, active: bool) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "password_hash": password_hash,
            "role": self.role,
            "active": active,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(subject: &str, secret: &str, exp_hours: i64) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours);

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": subject,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(subject: &str, secret: &str) -> String {
        Self::create_test_token(subject, secret, -1)
    }

    pub fn create_invalid_signature_token(subject: &str) -> String {
        Self::create_test_token(subject, "wrong-secret", 24)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn patient_row(patient_id: Uuid, full_name: &str, cpf: &str, active: bool) -> Value {
        json!({
            "id": patient_id,
            "full_name": full_name,
            "cpf": cpf,
            "date_of_birth": "1990-01-01",
            "phone_number": "+353 1 555 0100",
            "email": "patient@example.com",
            "address": "12 Clinic Road",
            "clinical_summary": null,
            "active": active,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn professional_row(
        professional_id: Uuid,
        full_name: &str,
        registration_number: &str,
        active: bool,
    ) -> Value {
        json!({
            "id": professional_id,
            "full_name": full_name,
            "registration_number": registration_number,
            "specialty": "General Practice",
            "email": "professional@example.com",
            "phone_number": "+353 1 555 0200",
            "active": active,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(
        appointment_id: Uuid,
        patient_id: Uuid,
        professional_id: Uuid,
        scheduled_at: DateTime<Utc>,
        status: &str,
    ) -> Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "professional_id": professional_id,
            "scheduled_at": scheduled_at.to_rfc3339(),
            "status": status,
            "notes": null,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
