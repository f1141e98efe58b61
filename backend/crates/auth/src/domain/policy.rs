//! Authorization Evaluator
//!
//! A single pure function decides every request: who may do what to
//! which kind of resource. Handlers and use cases never test roles
//! directly; they build an [`Actor`] and ask [`can_perform`].
//!
//! The rules:
//!
//! | Resource | Read | Create | Update/Delete |
//! |---|---|---|---|
//! | Catalog  | anyone | admin | admin |
//! | Account  | admin  | admin | admin |
//! | Review   | anyone | authenticated | author or moderator+ |
//! | Comment  | anyone | authenticated | author or moderator+ |
//!
//! Anonymous callers are rejected as unauthenticated before any
//! ownership comparison runs. Ownership is principal identity, not role:
//! a promoted author keeps author rights in addition to role rights.
//!
//! The self-service profile path (`/users/me`) is not routed through the
//! evaluator; it requires only an authenticated principal and cannot
//! change the role field.

use crate::domain::value_object::{user_id::UserId, user_role::UserRole};

/// The caller of an operation
///
/// A `Principal`'s role is the *effective* role - the superuser flag has
/// already been folded into `Admin` by `User::effective_role()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Principal { id: UserId, role: UserRole },
}

/// Operation being attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// Classification of the target resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Category, genre or title - content metadata
    Catalog,
    /// User accounts (admin management surface)
    Account,
    Review,
    Comment,
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No credential presented on a path that needs one (401)
    Unauthenticated,
    /// Authenticated but not privileged enough, and not the owner (403)
    Forbidden,
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    #[inline]
    pub const fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Evaluate whether `actor` may apply `action` to a resource of kind
/// `resource` owned by `owner` (`None` for unowned resources and for
/// creates, where no row exists yet).
///
/// Total and deterministic over its whole input space.
pub fn can_perform(
    actor: &Actor,
    action: Action,
    resource: ResourceKind,
    owner: Option<&UserId>,
) -> Decision {
    // Public reads short-circuit before any identity check
    if action == Action::Read && resource != ResourceKind::Account {
        return Decision::Allow;
    }

    // Everything past this point requires a principal
    let Actor::Principal { id, role } = actor else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    let allowed = match resource {
        ResourceKind::Catalog | ResourceKind::Account => role.is_admin(),
        ResourceKind::Review | ResourceKind::Comment => match action {
            Action::Read | Action::Create => true,
            Action::Update | Action::Delete => {
                owner.is_some_and(|o| o == id) || role.is_moderator_or_higher()
            }
        },
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIONS: [Action; 4] = [Action::Read, Action::Create, Action::Update, Action::Delete];
    const RESOURCES: [ResourceKind; 4] = [
        ResourceKind::Catalog,
        ResourceKind::Account,
        ResourceKind::Review,
        ResourceKind::Comment,
    ];
    const WRITES: [Action; 3] = [Action::Create, Action::Update, Action::Delete];

    fn principal(role: UserRole) -> (UserId, Actor) {
        let id = UserId::new();
        (id, Actor::Principal { id, role })
    }

    #[test]
    fn test_anonymous_reads() {
        for resource in RESOURCES {
            let expected = match resource {
                ResourceKind::Account => Decision::Deny(DenyReason::Unauthenticated),
                _ => Decision::Allow,
            };
            assert_eq!(
                can_perform(&Actor::Anonymous, Action::Read, resource, None),
                expected,
                "anonymous read on {resource:?}"
            );
        }
    }

    #[test]
    fn test_anonymous_writes_always_unauthenticated() {
        // Denied before ownership is even consulted: the owner argument
        // must not change the outcome.
        let owner = UserId::new();
        for resource in RESOURCES {
            for action in WRITES {
                for owner_arg in [None, Some(&owner)] {
                    assert_eq!(
                        can_perform(&Actor::Anonymous, action, resource, owner_arg),
                        Decision::Deny(DenyReason::Unauthenticated),
                        "anonymous {action:?} on {resource:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_plain_user_on_catalog_and_accounts() {
        let (_, actor) = principal(UserRole::User);
        for resource in [ResourceKind::Catalog, ResourceKind::Account] {
            for action in WRITES {
                assert_eq!(
                    can_perform(&actor, action, resource, None),
                    Decision::Deny(DenyReason::Forbidden),
                    "user {action:?} on {resource:?}"
                );
            }
        }
        assert_eq!(
            can_perform(&actor, Action::Read, ResourceKind::Account, None),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            can_perform(&actor, Action::Read, ResourceKind::Catalog, None),
            Decision::Allow
        );
    }

    #[test]
    fn test_authenticated_create_on_reviews_and_comments() {
        for role in [UserRole::User, UserRole::Moderator, UserRole::Admin] {
            let (_, actor) = principal(role);
            for resource in [ResourceKind::Review, ResourceKind::Comment] {
                assert_eq!(
                    can_perform(&actor, Action::Create, resource, None),
                    Decision::Allow,
                    "{role:?} create on {resource:?}"
                );
            }
        }
    }

    #[test]
    fn test_owner_may_edit_own_review() {
        let (id, actor) = principal(UserRole::User);
        for resource in [ResourceKind::Review, ResourceKind::Comment] {
            for action in [Action::Update, Action::Delete] {
                assert_eq!(
                    can_perform(&actor, action, resource, Some(&id)),
                    Decision::Allow
                );
            }
        }
    }

    #[test]
    fn test_non_owner_user_forbidden() {
        let (_, actor) = principal(UserRole::User);
        let other = UserId::new();
        for resource in [ResourceKind::Review, ResourceKind::Comment] {
            for action in [Action::Update, Action::Delete] {
                assert_eq!(
                    can_perform(&actor, action, resource, Some(&other)),
                    Decision::Deny(DenyReason::Forbidden)
                );
            }
        }
    }

    #[test]
    fn test_moderator_overrides_ownership() {
        let (_, actor) = principal(UserRole::Moderator);
        let other = UserId::new();
        for resource in [ResourceKind::Review, ResourceKind::Comment] {
            assert_eq!(
                can_perform(&actor, Action::Update, resource, Some(&other)),
                Decision::Allow
            );
            assert_eq!(
                can_perform(&actor, Action::Delete, resource, Some(&other)),
                Decision::Allow
            );
        }
        // But moderation does not extend to the catalog or accounts
        assert_eq!(
            can_perform(&actor, Action::Create, ResourceKind::Catalog, None),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            can_perform(&actor, Action::Read, ResourceKind::Account, None),
            Decision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_admin_allowed_everywhere() {
        let (_, actor) = principal(UserRole::Admin);
        let other = UserId::new();
        for resource in RESOURCES {
            for action in ACTIONS {
                assert_eq!(
                    can_perform(&actor, action, resource, Some(&other)),
                    Decision::Allow,
                    "admin {action:?} on {resource:?}"
                );
            }
        }
    }

    #[test]
    fn test_promoted_author_keeps_both_rights() {
        // Author rights come from identity, role rights from the role;
        // promotion adds the latter without dropping the former.
        let (id, _) = principal(UserRole::User);
        let promoted = Actor::Principal {
            id,
            role: UserRole::Moderator,
        };
        let other = UserId::new();
        assert_eq!(
            can_perform(&promoted, Action::Update, ResourceKind::Review, Some(&id)),
            Decision::Allow
        );
        assert_eq!(
            can_perform(&promoted, Action::Update, ResourceKind::Review, Some(&other)),
            Decision::Allow
        );
    }
}
