//! Permission evaluation.
//!
//! A stateless decision function mapping (actor, action, target) to an
//! allow/deny [`Decision`], driven by the actor's role plus its relationship
//! to the target (ownership for clients/contracts, assignment for events).
//!
//! - No IO
//! - No panics
//! - A denied check never raises; it returns a deny with a human-readable
//!   reason so callers can report and abort without crashing.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated actor a check is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRef {
    pub id: DbId,
    pub role: Role,
}

/// What the actor is trying to do to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// The record a check targets, reduced to the links permission rules need.
///
/// Ownership is carried by id, never by embedded entities: the caller
/// resolves the Event -> Contract -> Client -> User chain before asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Client {
        /// The commercial that owns the client.
        owning_commercial: DbId,
    },
    Contract {
        /// The commercial servicing the contract (the client's commercial).
        commercial: DbId,
    },
    Event {
        /// The commercial servicing the event's contract.
        contract_commercial: DbId,
        /// The support member assigned to the event, if any.
        assigned_support: Option<DbId>,
    },
}

impl Target {
    fn entity_name(&self) -> &'static str {
        match self {
            Target::Client { .. } => "client",
            Target::Contract { .. } => "contract",
            Target::Event { .. } => "event",
        }
    }
}

/// Outcome of a permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Granted,
    /// Denied, with the reason a caller can show as-is.
    Denied(String),
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Granted)
    }
}

/// Evaluate the permission table. First match wins; default deny.
///
/// | Role       | Client            | Contract          | Event                     |
/// |------------|-------------------|-------------------|---------------------------|
/// | admin      | allow             | allow             | allow                     |
/// | management | allow             | allow             | allow                     |
/// | commercial | iff owns client   | iff services it   | iff services its contract |
/// | support    | deny              | deny              | iff assigned              |
pub fn evaluate(actor: &ActorRef, action: Action, target: &Target) -> Decision {
    match actor.role {
        Role::Admin | Role::Management => Decision::Granted,
        Role::Commercial => match target {
            Target::Client { owning_commercial } if *owning_commercial == actor.id => {
                Decision::Granted
            }
            Target::Contract { commercial } if *commercial == actor.id => Decision::Granted,
            Target::Event { contract_commercial, .. } if *contract_commercial == actor.id => {
                Decision::Granted
            }
            other => Decision::Denied(format!(
                "commercial {} may only {} {}s they are responsible for",
                actor.id,
                action.as_str(),
                other.entity_name()
            )),
        },
        Role::Support => match target {
            Target::Event { assigned_support: Some(support), .. } if *support == actor.id => {
                Decision::Granted
            }
            Target::Event { .. } => Decision::Denied(format!(
                "support {} may only {} events assigned to them",
                actor.id,
                action.as_str()
            )),
            other => Decision::Denied(format!(
                "support staff may not {} {}s",
                action.as_str(),
                other.entity_name()
            )),
        },
    }
}

/// Guard: some authenticated actor is required (read-only listings).
pub fn require_authenticated(actor: Option<&ActorRef>) -> Result<&ActorRef, CoreError> {
    actor.ok_or_else(|| {
        CoreError::AuthenticationFailed("you must be logged in to perform this operation".into())
    })
}

/// Guard: the actor must be authorized for `action` on `target`.
///
/// A denied decision maps to [`CoreError::PermissionDenied`] carrying the
/// decision's reason.
pub fn require_allowed(actor: &ActorRef, action: Action, target: &Target) -> Result<(), CoreError> {
    match evaluate(actor, action, target) {
        Decision::Granted => Ok(()),
        Decision::Denied(reason) => Err(CoreError::PermissionDenied(reason)),
    }
}

/// Guard: the actor must hold one of the given roles.
pub fn require_role(actor: &ActorRef, roles: &[Role]) -> Result<(), CoreError> {
    if roles.contains(&actor.role) {
        Ok(())
    } else {
        Err(CoreError::PermissionDenied(format!(
            "this operation requires one of the roles: {}",
            roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: DbId, role: Role) -> ActorRef {
        ActorRef { id, role }
    }

    #[test]
    fn test_admin_and_management_always_allowed() {
        let targets = [
            Target::Client { owning_commercial: 9 },
            Target::Contract { commercial: 9 },
            Target::Event { contract_commercial: 9, assigned_support: None },
        ];
        for role in [Role::Admin, Role::Management] {
            for target in &targets {
                for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
                    assert!(evaluate(&actor(1, role), action, target).is_granted());
                }
            }
        }
    }

    #[test]
    fn test_commercial_limited_to_own_client() {
        let owner = actor(2, Role::Commercial);
        let rival = actor(3, Role::Commercial);
        let target = Target::Client { owning_commercial: 2 };

        assert!(evaluate(&owner, Action::Update, &target).is_granted());
        let decision = evaluate(&rival, Action::Update, &target);
        assert!(!decision.is_granted());
        match decision {
            Decision::Denied(reason) => assert!(reason.contains("responsible for")),
            Decision::Granted => unreachable!(),
        }
    }

    #[test]
    fn test_commercial_reaches_event_through_contract() {
        let commercial = actor(4, Role::Commercial);
        let own = Target::Event { contract_commercial: 4, assigned_support: Some(8) };
        let foreign = Target::Event { contract_commercial: 5, assigned_support: Some(8) };

        assert!(evaluate(&commercial, Action::Update, &own).is_granted());
        assert!(!evaluate(&commercial, Action::Update, &foreign).is_granted());
    }

    #[test]
    fn test_support_denied_on_clients_and_contracts() {
        let support = actor(8, Role::Support);
        assert!(!evaluate(&support, Action::Read, &Target::Client { owning_commercial: 8 })
            .is_granted());
        assert!(!evaluate(&support, Action::Update, &Target::Contract { commercial: 8 })
            .is_granted());
    }

    #[test]
    fn test_support_allowed_only_on_assigned_event() {
        let support = actor(8, Role::Support);
        let assigned = Target::Event { contract_commercial: 2, assigned_support: Some(8) };
        let other = Target::Event { contract_commercial: 2, assigned_support: Some(9) };
        let unassigned = Target::Event { contract_commercial: 2, assigned_support: None };

        assert!(evaluate(&support, Action::Update, &assigned).is_granted());
        assert!(!evaluate(&support, Action::Update, &other).is_granted());
        assert!(!evaluate(&support, Action::Update, &unassigned).is_granted());
    }

    #[test]
    fn test_require_authenticated_rejects_none() {
        let err = require_authenticated(None).unwrap_err();
        assert_eq!(err.kind(), "AUTHENTICATION_FAILED");

        let a = actor(1, Role::Admin);
        assert_eq!(require_authenticated(Some(&a)).unwrap().id, 1);
    }

    #[test]
    fn test_require_allowed_maps_denial_to_permission_denied() {
        let support = actor(8, Role::Support);
        let err = require_allowed(&support, Action::Delete, &Target::Client {
            owning_commercial: 1,
        })
        .unwrap_err();
        assert_eq!(err.kind(), "PERMISSION_DENIED");
    }

    #[test]
    fn test_require_role() {
        let commercial = actor(2, Role::Commercial);
        assert!(require_role(&commercial, &[Role::Commercial, Role::Management]).is_ok());
        let err = require_role(&commercial, &[Role::Admin]).unwrap_err();
        assert_eq!(err.kind(), "PERMISSION_DENIED");
    }
}
