//! Row-level access predicates.
//!
//! Every decision is a pure function of the caller's session facts and the
//! row being touched. The database layer expresses the read predicates as
//! SQL `WHERE` clauses; write paths fetch the pre-image and call the
//! functions here before any mutation reaches storage.
//!
//! | Table        | Read                                | Create            | Update                        | Delete          |
//! |--------------|-------------------------------------|-------------------|-------------------------------|-----------------|
//! | Lead         | tenant; admin, owner, or team member | tenant; any role | tenant; admin or owner        | tenant; admin   |
//! | Application  | tenant                              | tenant            | tenant on pre and post image  | tenant          |
//! | Task         | tenant                              | tenant            | tenant on pre and post image  | tenant          |
//!
//! Incomplete or malformed facts never admit anything.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::DbId;

/// Identity facts as carried by the caller's session.
///
/// Any of them may be missing (a token issued before the tenant was
/// assigned, an unknown role string, ...). Use [`CallerFacts::resolve`] to
/// obtain a [`Caller`] only when all three are usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerFacts {
    pub tenant_id: Option<DbId>,
    pub role: Option<String>,
    pub user_id: Option<DbId>,
}

/// A caller whose tenant, role, and identity are all known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub tenant_id: DbId,
    pub role: Role,
    pub user_id: DbId,
}

impl CallerFacts {
    /// Resolve the raw facts into a [`Caller`].
    ///
    /// Returns `None` when any fact is absent or the role is not one of the
    /// known roles.
    pub fn resolve(&self) -> Option<Caller> {
        let tenant_id = self.tenant_id?;
        let user_id = self.user_id?;
        let role = self.role.as_deref()?.parse::<Role>().ok()?;
        Some(Caller {
            tenant_id,
            role,
            user_id,
        })
    }
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn same_tenant(&self, tenant_id: DbId) -> bool {
        self.tenant_id == tenant_id
    }
}

impl From<Caller> for CallerFacts {
    fn from(caller: Caller) -> Self {
        Self {
            tenant_id: Some(caller.tenant_id),
            role: Some(caller.role.as_str().to_string()),
            user_id: Some(caller.user_id),
        }
    }
}

/// The access-relevant columns of a lead row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadFacts {
    pub tenant_id: DbId,
    pub owner_id: DbId,
    pub team_id: Option<DbId>,
}

/// Membership lookup: does the caller belong to `team_id`?
pub trait TeamMembership {
    fn has_team(&self, team_id: DbId) -> bool;
}

impl TeamMembership for HashSet<DbId> {
    fn has_team(&self, team_id: DbId) -> bool {
        self.contains(&team_id)
    }
}

impl TeamMembership for [DbId] {
    fn has_team(&self, team_id: DbId) -> bool {
        self.contains(&team_id)
    }
}

impl TeamMembership for Vec<DbId> {
    fn has_team(&self, team_id: DbId) -> bool {
        self.as_slice().has_team(team_id)
    }
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

/// Lead read rule. Production reads apply the equivalent SQL filter
/// (`LeadRepo::VISIBLE` in `leadflow-db`); this function is the reference it
/// is checked against.
pub fn can_read_lead<M: TeamMembership + ?Sized>(
    facts: &CallerFacts,
    lead: &LeadFacts,
    teams: &M,
) -> bool {
    let Some(caller) = facts.resolve() else {
        return false;
    };
    if !caller.same_tenant(lead.tenant_id) {
        return false;
    }
    caller.is_admin()
        || lead.owner_id == caller.user_id
        || (caller.role == Role::Counselor && lead.team_id.is_some_and(|t| teams.has_team(t)))
}

/// Any known role may create a lead, but only inside its own tenant.
pub fn can_create_lead(facts: &CallerFacts, new_tenant_id: DbId) -> bool {
    facts
        .resolve()
        .is_some_and(|caller| caller.same_tenant(new_tenant_id))
}

/// Update needs admin or ownership on the pre-image, and the post-image
/// must stay in the caller's tenant. Team visibility does not grant writes.
pub fn can_update_lead(facts: &CallerFacts, before: &LeadFacts, after_tenant_id: DbId) -> bool {
    let Some(caller) = facts.resolve() else {
        return false;
    };
    caller.same_tenant(before.tenant_id)
        && (caller.is_admin() || before.owner_id == caller.user_id)
        && caller.same_tenant(after_tenant_id)
}

pub fn can_delete_lead(facts: &CallerFacts, lead: &LeadFacts) -> bool {
    facts
        .resolve()
        .is_some_and(|caller| caller.same_tenant(lead.tenant_id) && caller.is_admin())
}

// ---------------------------------------------------------------------------
// Application / Task
// ---------------------------------------------------------------------------

/// Tenant isolation for applications and tasks: read, insert, and delete.
pub fn can_access_tenant_row(facts: &CallerFacts, row_tenant_id: DbId) -> bool {
    facts
        .resolve()
        .is_some_and(|caller| caller.same_tenant(row_tenant_id))
}

/// Tenant isolation on both sides of an update.
pub fn can_update_tenant_row(
    facts: &CallerFacts,
    before_tenant_id: DbId,
    after_tenant_id: DbId,
) -> bool {
    can_access_tenant_row(facts, before_tenant_id) && can_access_tenant_row(facts, after_tenant_id)
}

// ---------------------------------------------------------------------------
// Elevated service credential
// ---------------------------------------------------------------------------

/// Credential for internal service paths that bypass row-level filtering.
///
/// Distinct from [`CallerFacts`]: a function holding a
/// `ServiceRole` has no end-user identity and must not be confused with one.
/// Repositories expose `*_elevated` methods that demand a reference to it.
#[derive(Debug)]
pub struct ServiceRole {
    label: &'static str,
}

impl ServiceRole {
    /// Mint the service credential for a named internal function.
    pub fn internal(label: &'static str) -> Self {
        Self { label }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}
