use tracing::warn;

use shared_models::auth::{Role, Subject};
use shared_models::error::AppError;

/// Role-set-agnostic access guard: every operation declares its own
/// allowed-role slice and calls this one function. Returns the subject
/// unchanged so handlers can keep using it after the check.
pub fn authorize(subject: Subject, allowed: &[Role]) -> Result<Subject, AppError> {
    if allowed.contains(&subject.role) {
        return Ok(subject);
    }

    warn!(
        "Access denied for {} (role {}) - requires one of {:?}",
        subject.email, subject.role, allowed
    );
    Err(AppError::Forbidden("Insufficient role for this operation".to_string()))
}
