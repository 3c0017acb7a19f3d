use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role carried by every account. Closed set so every policy and
/// transition site matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Clinician,
    FrontDesk,
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Clinician => write!(f, "clinician"),
            Role::FrontDesk => write!(f, "front_desk"),
            Role::Patient => write!(f, "patient"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Claims embedded in the access token: the subject identifier (email)
/// plus issue/expiry timestamps. Role is intentionally not embedded; it
/// is resolved from the identity store on every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Identity store row. `password_hash` is an argon2 PHC string, never a
/// plaintext secret. Accounts are deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn to_subject(&self) -> Subject {
        Subject {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            active: self.active,
        }
    }
}

/// Authenticated identity handed to handlers once the token has been
/// verified and resolved against the identity store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Account projection returned by the auth endpoints; never exposes the
/// stored hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
            active: account.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::FrontDesk).unwrap(), "\"front_desk\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");

        let role: Role = serde_json::from_str("\"clinician\"").unwrap();
        assert_eq!(role, Role::Clinician);
    }

    #[test]
    fn account_response_drops_hash() {
        let account = Account {
            id: Uuid::new_v4(),
            email: "front@clinic.example".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            role: Role::FrontDesk,
            active: true,
            created_at: Utc::now(),
        };

        let response = AccountResponse::from(&account);
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "front@clinic.example");
    }
}
