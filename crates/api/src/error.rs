// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fieldcheck::{CoreError, ErrorKind};
use fieldcheck_domain::DomainError;
use fieldcheck_persistence::PersistenceError;
use thiserror::Error;

/// Authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The actor's role may not perform the action at all.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The role is sufficient but the target is outside the actor's scope.
    #[error("Forbidden: '{action}' {reason}")]
    OutOfScope {
        /// The action that was attempted.
        action: String,
        /// Why the target is out of scope.
        reason: String,
    },
    /// The claimed role is not recognised.
    #[error("Invalid role: '{0}'")]
    InvalidRole(String),
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant carries the stable [`ErrorKind`] reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Authorization failed - the actor does not have permission.
    #[error("{0}")]
    Unauthorized(AuthError),
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The stable error code.
        kind: ErrorKind,
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The stable error code.
        kind: ErrorKind,
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: ErrorKind,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The write lost a race or duplicates an existing record.
    #[error("Conflict ({kind}): {message}")]
    Conflict {
        /// The stable error code.
        kind: ErrorKind,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// The stable error code for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::InvalidInput { kind, .. }
            | Self::ResourceNotFound { kind, .. }
            | Self::Conflict { kind, .. } => *kind,
            Self::DomainRuleViolation { rule, .. } => *rule,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_input(kind: ErrorKind, field: &str, message: String) -> Self {
        Self::InvalidInput {
            kind,
            field: field.to_string(),
            message,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let kind: ErrorKind = ErrorKind::of_domain(&err);
    let message: String = err.to_string();
    match err {
        DomainError::InvalidCoordinate { .. } => ApiError::invalid_input(kind, "location", message),
        DomainError::InvalidRadius { .. } => ApiError::invalid_input(kind, "radius_m", message),
        DomainError::InvalidIdentifier { field, .. } => {
            ApiError::invalid_input(kind, field, message)
        }
        DomainError::InvalidPhoto { .. } => ApiError::invalid_input(kind, "photo", message),
        DomainError::InvalidReason { .. } => ApiError::invalid_input(kind, "reason", message),
        DomainError::InvalidTimezone(_) => ApiError::invalid_input(kind, "timezone", message),
        DomainError::DateConversion { .. } => ApiError::Internal { message },
        DomainError::OfficeNotFound { .. } => ApiError::ResourceNotFound {
            kind,
            resource_type: String::from("Office"),
            message,
        },
        DomainError::AttendanceNotFound(_) => ApiError::ResourceNotFound {
            kind,
            resource_type: String::from("Attendance"),
            message,
        },
        DomainError::DuplicateAction { .. } => ApiError::Conflict { kind, message },
        DomainError::OfficeInactive { .. }
        | DomainError::NoActiveCheckIn { .. }
        | DomainError::CheckInNotApproved { .. }
        | DomainError::AlreadyCheckedOut { .. }
        | DomainError::CheckOutBeforeCheckIn { .. }
        | DomainError::ActionNotRecorded { .. }
        | DomainError::ReasonNotRequired { .. }
        | DomainError::ReasonAlreadyProvided { .. }
        | DomainError::ReasonRequired { .. }
        | DomainError::RejectionReasonRequired { .. }
        | DomainError::CheckInLocked { .. } => ApiError::DomainRuleViolation {
            rule: kind,
            message,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Conflict { .. } => ApiError::Conflict {
            kind: ErrorKind::Conflict,
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Store-level uniqueness and version failures become the same conflicts the
/// engine reports; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::VersionConflict { attendance_id } => {
            translate_core_error(CoreError::Conflict { attendance_id })
        }
        PersistenceError::DuplicateRecord { .. } => ApiError::Conflict {
            kind: ErrorKind::DuplicateAction,
            message: err.to_string(),
        },
        PersistenceError::OfficeNotFound(office_id) => {
            translate_domain_error(DomainError::OfficeNotFound { office_id })
        }
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
