use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::JwtClaims;

type HmacSha256 = Hmac<Sha256>;

/// Fixed access-token lifetime.
pub const TOKEN_TTL_MINUTES: i64 = 60;

fn sign(signing_input: &str, jwt_secret: &str) -> Result<Vec<u8>, String> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Mint a signed HS256 token for the given subject identifier, expiring
/// `TOKEN_TTL_MINUTES` from now. No stored state is touched.
pub fn issue_token(subject: &str, jwt_secret: &str) -> Result<String, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let now = Utc::now();
    let claims = JwtClaims {
        sub: subject.to_string(),
        iat: now.timestamp() as u64,
        exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp() as u64,
    };

    let header = json!({
        "alg": "HS256",
        "typ": "JWT"
    });

    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let claims_b64 = URL_SAFE_NO_PAD.encode(
        serde_json::to_string(&claims).map_err(|e| format!("Failed to encode claims: {}", e))?,
    );

    let signing_input = format!("{}.{}", header_b64, claims_b64);
    let signature = sign(&signing_input, jwt_secret)?;

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

/// Verify a presented token's signature and expiry and return its claims.
/// Signature comparison goes through `Mac::verify_slice`, which is
/// constant-time. Resolution of the subject against the identity store is
/// the caller's job.
pub fn verify_token(token: &str, jwt_secret: &str) -> Result<JwtClaims, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    let now = Utc::now().timestamp() as u64;
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    debug!("Token validated successfully for subject: {}", claims.sub);
    Ok(claims)
}
