// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization of already-authenticated actors.
//!
//! Identity arrives from an upstream authentication layer as an id and a
//! role. This module decides what that actor may do; it never issues or
//! validates credentials.

use std::str::FromStr;

use fieldcheck_audit::Actor;
use fieldcheck_domain::{AttendanceRecord, Office, OfficerId};

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Field officer: records their own attendance and reasons.
    Officer,
    /// Supervisor: decides attendance at the offices they are assigned to.
    Supervisor,
    /// Admin: decides attendance at any office.
    Admin,
}

impl Role {
    /// Returns the string representation used in audit records.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Officer => "officer",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
        }
    }

    const fn can_decide(self) -> bool {
        matches!(self, Self::Supervisor | Self::Admin)
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "officer" => Ok(Self::Officer),
            "supervisor" => Ok(Self::Supervisor),
            "admin" => Ok(Self::Admin),
            _ => Err(AuthError::InvalidRole(s.to_string())),
        }
    }
}

/// An authenticated actor with an assigned role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor's identifier. For officers this is their officer id.
    pub id: String,
    /// The actor's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this actor into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }
}

/// Authorization service for attendance operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Officers submit check-ins, check-outs and reasons only for themselves.
    /// Admins may act on an officer's behalf.
    ///
    /// # Errors
    ///
    /// Returns an error for supervisors and for officers acting for someone else.
    pub fn authorize_officer_action(
        actor: &AuthenticatedActor,
        action: &str,
        officer_id: &OfficerId,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Officer if actor.id == officer_id.value() => Ok(()),
            Role::Officer => Err(AuthError::OutOfScope {
                action: action.to_string(),
                reason: format!("may only be performed by officer '{officer_id}'"),
            }),
            Role::Supervisor => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Officer"),
            }),
        }
    }

    /// Only supervisors and admins may approve or reject.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is an officer.
    pub fn authorize_decide(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        if actor.role.can_decide() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("decide"),
                required_role: String::from("Supervisor"),
            })
        }
    }

    /// A supervisor decides only at offices they are assigned to.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor may not decide at `office`.
    pub fn authorize_office_decision(
        actor: &AuthenticatedActor,
        office: Option<&Office>,
    ) -> Result<(), AuthError> {
        Self::authorize_decide(actor)?;
        if actor.role == Role::Supervisor && !office.is_some_and(|o| o.is_supervised_by(&actor.id))
        {
            return Err(AuthError::OutOfScope {
                action: String::from("decide"),
                reason: String::from("actor does not supervise the record's office"),
            });
        }
        Ok(())
    }

    /// Pending queues are visible to their supervisors and to admins.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor may not view the queue.
    pub fn authorize_pending_view(
        actor: &AuthenticatedActor,
        office: Option<&Office>,
        supervisor_id: Option<&str>,
    ) -> Result<(), AuthError> {
        if !actor.role.can_decide() {
            return Err(AuthError::Unauthorized {
                action: String::from("get_pending_approvals"),
                required_role: String::from("Supervisor"),
            });
        }
        if actor.role == Role::Admin {
            return Ok(());
        }
        if office.is_some_and(|o| !o.is_supervised_by(&actor.id)) {
            return Err(AuthError::OutOfScope {
                action: String::from("get_pending_approvals"),
                reason: String::from("actor does not supervise the requested office"),
            });
        }
        if supervisor_id.is_some_and(|s| s != actor.id) {
            return Err(AuthError::OutOfScope {
                action: String::from("get_pending_approvals"),
                reason: String::from("supervisors may only view their own queue"),
            });
        }
        Ok(())
    }

    /// An officer sees their own records; supervisors see their offices'.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is outside the actor's scope.
    pub fn authorize_view_record(
        actor: &AuthenticatedActor,
        record: &AttendanceRecord,
        office: Option<&Office>,
    ) -> Result<(), AuthError> {
        let allowed: bool = match actor.role {
            Role::Admin => true,
            Role::Officer => actor.id == record.officer_id.value(),
            Role::Supervisor => office.is_some_and(|o| o.is_supervised_by(&actor.id)),
        };
        if allowed {
            Ok(())
        } else {
            Err(AuthError::OutOfScope {
                action: String::from("view_attendance"),
                reason: format!("attendance {} is not visible to this actor", record.id()),
            })
        }
    }

    /// Officers read their own hours; supervisors and admins read anyone's.
    ///
    /// # Errors
    ///
    /// Returns an error if an officer asks for someone else's hours.
    pub fn authorize_view_hours(
        actor: &AuthenticatedActor,
        officer_id: &OfficerId,
    ) -> Result<(), AuthError> {
        if actor.role == Role::Officer && actor.id != officer_id.value() {
            return Err(AuthError::OutOfScope {
                action: String::from("hours_summary"),
                reason: format!("may only be viewed by officer '{officer_id}'"),
            });
        }
        Ok(())
    }
}

