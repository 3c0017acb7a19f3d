use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::auth::Account;

/// Every collaborator call must complete or fail within this bound;
/// a stalled store surfaces as `DbError::Unavailable`, never a hang.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Storage collaborator failures, kept distinct so callers can tell
/// "row does not exist" from "store is down" from "write lost a race".
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for shared_models::error::AppError {
    fn from(e: DbError) -> Self {
        use shared_models::error::AppError;
        match e {
            DbError::Conflict(msg) => AppError::Conflict(msg),
            DbError::NotFound(msg) => AppError::NotFound(msg),
            DbError::Unavailable(msg) => AppError::StorageUnavailable(msg),
        }
    }
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.supabase_url.clone(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            );
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, DbError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| e.to_string());
            error!("Store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                404 => DbError::NotFound(error_text),
                409 => DbError::Conflict(error_text),
                _ => DbError::Unavailable(format!("store error ({}): {}", status, error_text)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DbError::Unavailable(format!("failed to decode store response: {}", e)))
    }

    /// Look up an identity-store account by email. `None` means no row,
    /// which callers must not conflate with a transport failure.
    pub async fn find_account(&self, email: &str) -> Result<Option<Account>, DbError> {
        let path = format!("/rest/v1/accounts?email=eq.{}&limit=1", email);

        let mut result: Vec<Account> = self.request(Method::GET, &path, None, None).await?;

        if result.is_empty() {
            return Ok(None);
        }

        Ok(Some(result.remove(0)))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
