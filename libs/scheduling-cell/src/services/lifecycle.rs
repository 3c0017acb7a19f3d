use tracing::{debug, warn};

use crate::models::{AppointmentStatus, ScheduleError};

/// Appointment status state machine. Matching is exhaustive so a new
/// status cannot be silently mishandled at a transition site.
pub struct AppointmentLifecycle;

impl AppointmentLifecycle {
    /// Valid next statuses for a given current status.
    pub fn valid_transitions(current: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Cancelled,
                AppointmentStatus::Completed,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Cancelled => vec![],
            AppointmentStatus::Completed => vec![],
        }
    }

    pub fn is_terminal(status: &AppointmentStatus) -> bool {
        Self::valid_transitions(status).is_empty()
    }

    pub fn validate_transition(
        current: &AppointmentStatus,
        next: &AppointmentStatus,
    ) -> Result<(), ScheduleError> {
        debug!("Validating status transition {} -> {}", current, next);

        if !Self::valid_transitions(current).contains(next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(ScheduleError::InvalidTransition(*current));
        }

        Ok(())
    }
}
