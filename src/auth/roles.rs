// src/auth/roles.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Mod,
    Leader,
    Citizen,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Mod => "mod",
            Role::Leader => "leader",
            Role::Citizen => "citizen",
        }
    }

    /// Government staff: admins and moderators.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Mod)
    }

    pub fn permissions(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::Admin => &[
                ViewAllReports,
                CreateReport,
                EditReport,
                DeleteReport,
                ApproveReport,
                ViewStats,
                ManageTemplates,
                ManageTdp,
            ],
            Role::Mod => &[
                ViewAllReports,
                CreateReport,
                EditReport,
                ApproveReport,
                ViewStats,
                ManageTemplates,
            ],
            Role::Leader => &[ViewOwnReports, SubmitReport],
            Role::Citizen => &[],
        }
    }

    pub fn has(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewAllReports,
    CreateReport,
    EditReport,
    DeleteReport,
    ApproveReport,
    ViewStats,
    ManageTemplates,
    ManageTdp,
    SubmitReport,
    ViewOwnReports,
}

/// Static allow-lists, loaded from the `roles` section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    pub admin_ids: HashSet<String>,
    pub mod_ids: HashSet<String>,
    pub leader_ids: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct RoleResolver {
    cfg: RoleConfig,
}

impl RoleResolver {
    pub fn new(cfg: RoleConfig) -> Self {
        Self { cfg }
    }

    /// Lists are scanned one at a time against every candidate id, so an id
    /// on the admin list beats an id on the leader list regardless of which
    /// candidate slot it came from.
    pub fn resolve(&self, primary: Option<&str>, secondary: Option<&str>) -> Role {
        let ids: Vec<&str> = [primary, secondary]
            .into_iter()
            .flatten()
            .filter(|id| !id.is_empty())
            .collect();

        let lists = [
            (&self.cfg.admin_ids, Role::Admin),
            (&self.cfg.mod_ids, Role::Mod),
            (&self.cfg.leader_ids, Role::Leader),
        ];

        for (list, role) in lists {
            if ids.iter().any(|id| list.contains(*id)) {
                return role;
            }
        }

        Role::Citizen
    }

    pub fn can_access_report_workflow(&self, primary: Option<&str>, secondary: Option<&str>) -> bool {
        matches!(
            self.resolve(primary, secondary),
            Role::Admin | Role::Mod | Role::Leader
        )
    }

    pub fn has_permission(
        &self,
        primary: Option<&str>,
        secondary: Option<&str>,
        permission: Permission,
    ) -> bool {
        self.resolve(primary, secondary).has(permission)
    }
}
