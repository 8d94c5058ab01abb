//! Enrollment status workflow.
//!
//! Pure decisions over an already loaded enrollment. The service loads the
//! row, asks this module what may happen and writes the result back under a
//! version check.

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    auth::{Identity, Role, UserUuid},
    domain::enrollments::records::{EnrollmentRecord, EnrollmentStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("role {0} may not act on enrollments")]
    RoleNotPermitted(Role),

    #[error("enrollment belongs to another user")]
    NotOwner,

    #[error("users may only delete their enrollments")]
    UserMayOnlyDelete,

    #[error("cannot move enrollment from {from} to {to}")]
    InvalidTransition {
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    },

    #[error("offerings of a {0} enrollment cannot be changed")]
    LinksLocked(EnrollmentStatus),

    #[error("the owner already has a draft enrollment")]
    DraftAlreadyExists,
}

impl WorkflowError {
    /// Access failures, as opposed to requests that clash with the current
    /// state.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::RoleNotPermitted(_) | Self::NotOwner | Self::UserMayOnlyDelete
        )
    }
}

/// The values a status write stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: EnrollmentStatus,
    pub moderator: Option<UserUuid>,
    pub processed_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

impl StatusChange {
    fn carry_over(enrollment: &EnrollmentRecord, status: EnrollmentStatus) -> Self {
        Self {
            status,
            moderator: enrollment.moderator,
            processed_at: enrollment.processed_at,
            finished_at: enrollment.finished_at,
        }
    }
}

/// Decide whether `actor` may move `enrollment` to `requested`.
///
/// # Errors
///
/// Returns a [`WorkflowError`] describing why the move is refused.
pub fn plan_transition(
    actor: Identity,
    enrollment: &EnrollmentRecord,
    requested: EnrollmentStatus,
    now: Timestamp,
) -> Result<StatusChange, WorkflowError> {
    let from = enrollment.status;

    match actor.role {
        Role::Undefined => Err(WorkflowError::RoleNotPermitted(actor.role)),
        Role::User => {
            if enrollment.user != actor.user {
                return Err(WorkflowError::NotOwner);
            }

            if requested != EnrollmentStatus::Deleted {
                return Err(WorkflowError::UserMayOnlyDelete);
            }

            if !matches!(from, EnrollmentStatus::Draft | EnrollmentStatus::Formed) {
                return Err(WorkflowError::InvalidTransition {
                    from,
                    to: requested,
                });
            }

            Ok(StatusChange::carry_over(enrollment, requested))
        }
        Role::Moderator | Role::Admin => {
            if from == requested {
                return Err(WorkflowError::InvalidTransition {
                    from,
                    to: requested,
                });
            }

            let mut change = StatusChange::carry_over(enrollment, requested);

            if from == EnrollmentStatus::Draft {
                change.moderator = Some(actor.user);
                change.processed_at = Some(now);
            }

            if requested.is_decision() && change.finished_at.is_none() {
                change.finished_at = Some(now);
            }

            Ok(change)
        }
    }
}

/// Owners and staff may read an enrollment.
///
/// # Errors
///
/// Returns [`WorkflowError::NotOwner`] for someone else's enrollment.
pub fn authorize_view(actor: Identity, enrollment: &EnrollmentRecord) -> Result<(), WorkflowError> {
    match actor.role {
        Role::Undefined => Err(WorkflowError::RoleNotPermitted(actor.role)),
        Role::User if enrollment.user != actor.user => Err(WorkflowError::NotOwner),
        Role::User | Role::Moderator | Role::Admin => Ok(()),
    }
}

/// Users edit offerings of their own draft only; staff of anything still
/// open.
///
/// # Errors
///
/// Returns a [`WorkflowError`] when the links may not change.
pub fn authorize_link_edit(
    actor: Identity,
    enrollment: &EnrollmentRecord,
) -> Result<(), WorkflowError> {
    match actor.role {
        Role::Undefined => Err(WorkflowError::RoleNotPermitted(actor.role)),
        Role::User => {
            if enrollment.user != actor.user {
                return Err(WorkflowError::NotOwner);
            }

            if enrollment.status != EnrollmentStatus::Draft {
                return Err(WorkflowError::LinksLocked(enrollment.status));
            }

            Ok(())
        }
        Role::Moderator | Role::Admin => {
            if enrollment.status.is_terminal() {
                return Err(WorkflowError::LinksLocked(enrollment.status));
            }

            Ok(())
        }
    }
}

/// Moderator or admin only.
///
/// # Errors
///
/// Returns [`WorkflowError::RoleNotPermitted`] for everybody else.
pub fn authorize_staff(actor: Identity) -> Result<(), WorkflowError> {
    if actor.role.is_staff() {
        Ok(())
    } else {
        Err(WorkflowError::RoleNotPermitted(actor.role))
    }
}
