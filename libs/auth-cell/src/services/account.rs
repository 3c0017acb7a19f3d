use chrono::Utc;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};
use shared_models::auth::{Account, SignupRequest};
use shared_models::error::AppError;

use super::password::PasswordService;

pub struct AccountService {
    supabase: SupabaseClient,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Register a new account. Email must be unique; the secret is stored
    /// only as an argon2 hash. Accounts start active and are never
    /// deleted, only deactivated.
    pub async fn signup(&self, request: SignupRequest) -> Result<Account, AppError> {
        debug!("Creating account for {}", request.email);

        let existing = self.supabase.find_account(&request.email).await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        let account_data = json!({
            "id": Uuid::new_v4(),
            "email": request.email,
            "password_hash": password_hash,
            "role": request.role,
            "active": true,
            "created_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let mut result: Vec<Account> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/accounts",
                None,
                Some(account_data),
                Some(headers),
            )
            .await
            .map_err(|e| match e {
                // Unique index on email catches a concurrent signup
                DbError::Conflict(_) => AppError::Conflict("Email already registered".to_string()),
                other => other.into(),
            })?;

        if result.is_empty() {
            return Err(AppError::Internal("Failed to create account".to_string()));
        }

        let account = result.remove(0);
        debug!("Account created with ID: {}", account.id);
        Ok(account)
    }

    /// Verify a presented secret. Absent account, deactivated account and
    /// wrong secret are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AppError> {
        let invalid = || AppError::Unauthenticated("Invalid email or password".to_string());

        let account = self
            .supabase
            .find_account(email)
            .await?
            .ok_or_else(invalid)?;

        if !account.active {
            warn!("Login attempt for deactivated account {}", email);
            return Err(invalid());
        }

        let verified = PasswordService::verify_password(password, &account.password_hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;

        if !verified {
            return Err(invalid());
        }

        Ok(account)
    }
}
