// src/auth/identity.rs
use crate::auth::roles::{Permission, Role, RoleResolver};
use crate::domain::report::Actor;
use crate::errors::ServerError;
use astra::Request;

pub const HEADER_ID_BY_OA: &str = "X-Zalo-Id-By-OA";
pub const HEADER_RAW_ID: &str = "X-Zalo-Id";
pub const HEADER_NAME: &str = "X-Zalo-Name";

/// The identity the mini-app host vouches for, plus the role derived from it.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id_by_oa: Option<String>,
    pub raw_id: Option<String>,
    pub name: String,
    pub role: Role,
}

impl Caller {
    pub fn from_request(req: &Request, roles: &RoleResolver) -> Caller {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let id_by_oa = header(HEADER_ID_BY_OA);
        let raw_id = header(HEADER_RAW_ID);
        let name = header(HEADER_NAME).unwrap_or_default();
        let role = roles.resolve(id_by_oa.as_deref(), raw_id.as_deref());

        Caller {
            id_by_oa,
            raw_id,
            name,
            role,
        }
    }

    /// Candidate ids in resolution order, empty ones already dropped.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        [self.id_by_oa.as_deref(), self.raw_id.as_deref()]
            .into_iter()
            .flatten()
    }

    pub fn primary_id(&self) -> Option<&str> {
        self.ids().next()
    }

    pub fn owns(&self, leader_identity: &str) -> bool {
        self.ids().any(|id| id == leader_identity)
    }

    pub fn actor(&self) -> Actor {
        let identity = self.primary_id().unwrap_or_default().to_string();
        let name = if self.name.is_empty() {
            identity.clone()
        } else {
            self.name.clone()
        };
        Actor { identity, name }
    }

    pub fn require(&self, permission: Permission) -> Result<(), ServerError> {
        if self.role.has(permission) {
            Ok(())
        } else {
            Err(ServerError::Forbidden(format!(
                "role '{}' lacks permission {:?}",
                self.role.as_str(),
                permission
            )))
        }
    }

    pub fn require_staff(&self) -> Result<(), ServerError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(ServerError::Forbidden("staff only".into()))
        }
    }

    pub fn require_identity(&self) -> Result<&str, ServerError> {
        self.primary_id()
            .ok_or_else(|| ServerError::Unauthorized("missing caller identity".into()))
    }
}
