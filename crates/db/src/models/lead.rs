//! Lead entity model and DTOs.

use leadflow_core::access::LeadFacts;
use leadflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub tenant_id: DbId,
    pub owner_id: DbId,
    pub team_id: Option<DbId>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub stage: String,
    pub source: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    /// The columns the access layer decides on.
    pub fn access_facts(&self) -> LeadFacts {
        LeadFacts {
            tenant_id: self.tenant_id,
            owner_id: self.owner_id,
            team_id: self.team_id,
        }
    }
}

/// DTO for inserting a lead. Tenant and owner are always resolved by the
/// caller before reaching the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub tenant_id: DbId,
    pub owner_id: DbId,
    pub team_id: Option<DbId>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Defaults to `new` if omitted.
    pub stage: Option<String>,
    pub source: Option<String>,
}

/// DTO for updating a lead. All fields are optional.
///
/// `tenant_id` is accepted so that an attempt to move a lead can be seen
/// and rejected; the repository never writes it. `team_id` distinguishes an
/// absent field (`None`, keep) from an explicit `null` (`Some(None)`, clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLead {
    pub tenant_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    #[serde(default, deserialize_with = "present")]
    pub team_id: Option<Option<DbId>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub stage: Option<String>,
    pub source: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<DbId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DbId>::deserialize(deserializer).map(Some)
}
