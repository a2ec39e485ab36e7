//! BOQ lifecycle transitions.
//!
//! BOQs follow their own state machine, independent of payments:
//! `Draft → Sent → Approved`, with `Draft | Sent → Rejected`. Both
//! `Approved` and `Rejected` are terminal; `Approved` additionally
//! locks the document against edit and delete.

use super::error::LifecycleError;
use super::types::BoqStatus;

/// Stateless service for BOQ lifecycle rules.
pub struct BoqLifecycle;

impl BoqLifecycle {
    /// Marks a draft BOQ as sent to the client.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidTransition` unless the BOQ is in
    /// `Draft` status.
    pub fn send(current: BoqStatus) -> Result<BoqStatus, LifecycleError> {
        match current {
            BoqStatus::Draft => Ok(BoqStatus::Sent),
            _ => Err(LifecycleError::InvalidTransition {
                from: current.as_str(),
                to: BoqStatus::Sent.as_str(),
            }),
        }
    }

    /// Marks a sent BOQ as approved by the client.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidTransition` unless the BOQ is in
    /// `Sent` status.
    pub fn approve(current: BoqStatus) -> Result<BoqStatus, LifecycleError> {
        match current {
            BoqStatus::Sent => Ok(BoqStatus::Approved),
            _ => Err(LifecycleError::InvalidTransition {
                from: current.as_str(),
                to: BoqStatus::Approved.as_str(),
            }),
        }
    }

    /// Marks a BOQ as rejected by the client.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidTransition` unless the BOQ is in
    /// `Draft` or `Sent` status.
    pub fn reject(current: BoqStatus) -> Result<BoqStatus, LifecycleError> {
        match current {
            BoqStatus::Draft | BoqStatus::Sent => Ok(BoqStatus::Rejected),
            _ => Err(LifecycleError::InvalidTransition {
                from: current.as_str(),
                to: BoqStatus::Rejected.as_str(),
            }),
        }
    }

    /// Validates that the BOQ may be edited.
    ///
    /// Approved BOQs are immutable.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::EditLocked` for approved BOQs.
    pub fn validate_can_edit(status: BoqStatus) -> Result<(), LifecycleError> {
        if status == BoqStatus::Approved {
            return Err(LifecycleError::EditLocked {
                status: status.as_str(),
            });
        }
        Ok(())
    }

    /// Validates that the BOQ may be deleted.
    ///
    /// Deletion is blocked only for approved BOQs.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::DeleteLocked` for approved BOQs.
    pub fn validate_can_delete(status: BoqStatus) -> Result<(), LifecycleError> {
        if status == BoqStatus::Approved {
            return Err(LifecycleError::DeleteLocked {
                status: status.as_str(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_send_from_draft() {
        assert_eq!(BoqLifecycle::send(BoqStatus::Draft), Ok(BoqStatus::Sent));
    }

    #[test]
    fn test_send_from_other_statuses_rejected() {
        for status in [BoqStatus::Sent, BoqStatus::Approved, BoqStatus::Rejected] {
            assert!(matches!(
                BoqLifecycle::send(status),
                Err(LifecycleError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_approve_from_sent() {
        assert_eq!(
            BoqLifecycle::approve(BoqStatus::Sent),
            Ok(BoqStatus::Approved)
        );
    }

    #[test]
    fn test_approve_requires_sent() {
        for status in [BoqStatus::Draft, BoqStatus::Approved, BoqStatus::Rejected] {
            assert!(matches!(
                BoqLifecycle::approve(status),
                Err(LifecycleError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_reject_from_draft_or_sent() {
        assert_eq!(
            BoqLifecycle::reject(BoqStatus::Draft),
            Ok(BoqStatus::Rejected)
        );
        assert_eq!(
            BoqLifecycle::reject(BoqStatus::Sent),
            Ok(BoqStatus::Rejected)
        );
    }

    #[test]
    fn test_terminal_statuses_cannot_be_rejected() {
        for status in [BoqStatus::Approved, BoqStatus::Rejected] {
            assert!(matches!(
                BoqLifecycle::reject(status),
                Err(LifecycleError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_approved_blocks_edit_and_delete() {
        assert!(matches!(
            BoqLifecycle::validate_can_edit(BoqStatus::Approved),
            Err(LifecycleError::EditLocked { .. })
        ));
        assert!(matches!(
            BoqLifecycle::validate_can_delete(BoqStatus::Approved),
            Err(LifecycleError::DeleteLocked { .. })
        ));
    }

    #[rstest]
    #[case(BoqStatus::Draft)]
    #[case(BoqStatus::Sent)]
    #[case(BoqStatus::Rejected)]
    fn test_non_approved_statuses_allow_edit_and_delete(#[case] status: BoqStatus) {
        assert!(BoqLifecycle::validate_can_edit(status).is_ok());
        assert!(BoqLifecycle::validate_can_delete(status).is_ok());
    }
}
