// src/domain/tdp.rs
use crate::errors::ServerError;
use serde::{Deserialize, Deserializer, Serialize};

/// A neighborhood unit ("tổ dân phố") and its leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tdp {
    pub id: String,
    pub name: String,
    pub leader_identity: String,
    pub leader_name: String,
    pub leader_phone: String,
    pub address: String,
    pub household_count: i64,
    pub population_count: i64,
    pub active: bool,
    pub description: Option<String>,
    pub created_at: i64,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTdp {
    pub name: String,
    #[serde(alias = "leaderZaloId")]
    pub leader_identity: String,
    #[serde(default)]
    pub leader_name: String,
    #[serde(default)]
    pub leader_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub household_count: i64,
    #[serde(default)]
    pub population_count: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTdp {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.name.trim().is_empty() {
            return Err(ServerError::BadRequest("TDP name is required".into()));
        }
        if self.leader_identity.trim().is_empty() {
            return Err(ServerError::BadRequest("leader identity is required".into()));
        }
        validate_counts(self.household_count, self.population_count)
    }

    pub fn into_tdp(self, id: String, now: i64) -> Tdp {
        Tdp {
            id,
            name: self.name.trim().to_string(),
            leader_identity: self.leader_identity.trim().to_string(),
            leader_name: self.leader_name,
            leader_phone: self.leader_phone,
            address: self.address,
            household_count: self.household_count,
            population_count: self.population_count,
            active: self.active,
            description: self.description,
            created_at: now,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TdpPatch {
    pub name: Option<String>,
    #[serde(alias = "leaderZaloId")]
    pub leader_identity: Option<String>,
    pub leader_name: Option<String>,
    pub leader_phone: Option<String>,
    pub address: Option<String>,
    pub household_count: Option<i64>,
    pub population_count: Option<i64>,
    pub active: Option<bool>,
    /// `null` or `""` clears the description.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

/// Tells an explicit `null` (`Some(None)`) apart from an absent key (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TdpPatch {
    pub fn apply(self, tdp: &mut Tdp) -> Result<(), ServerError> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err(ServerError::BadRequest("TDP name is required".into()));
            }
            tdp.name = name.trim().to_string();
        }
        if let Some(leader) = self.leader_identity {
            if leader.trim().is_empty() {
                return Err(ServerError::BadRequest("leader identity is required".into()));
            }
            tdp.leader_identity = leader.trim().to_string();
        }
        if let Some(v) = self.leader_name {
            tdp.leader_name = v;
        }
        if let Some(v) = self.leader_phone {
            tdp.leader_phone = v;
        }
        if let Some(v) = self.address {
            tdp.address = v;
        }
        if let Some(v) = self.household_count {
            tdp.household_count = v;
        }
        if let Some(v) = self.population_count {
            tdp.population_count = v;
        }
        if let Some(v) = self.active {
            tdp.active = v;
        }
        if let Some(v) = self.description {
            tdp.description = v.filter(|d| !d.trim().is_empty());
        }
        validate_counts(tdp.household_count, tdp.population_count)
    }
}

fn validate_counts(households: i64, population: i64) -> Result<(), ServerError> {
    if households < 0 || population < 0 {
        return Err(ServerError::BadRequest("counts must not be negative".into()));
    }
    Ok(())
}
