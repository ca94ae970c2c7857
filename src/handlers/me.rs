// src/handlers/me.rs
use serde::Serialize;

use crate::app::App;
use crate::auth::{Caller, Permission, Role};
use crate::db::tdp::find_active_by_leader;
use crate::domain::tdp::Tdp;
use crate::responses::{ok_json, ResultResp};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Me<'a> {
    id: Option<&'a str>,
    name: &'a str,
    role: Role,
    permissions: &'static [Permission],
    can_access_report_workflow: bool,
    can_view_stats: bool,
    tdp: Option<Tdp>,
}

pub fn get_me(app: &App, caller: &Caller) -> ResultResp {
    let tdp = if caller.role == Role::Leader {
        let ids: Vec<&str> = caller.ids().collect();
        app.db.with_conn(|conn| find_active_by_leader(conn, &ids))?
    } else {
        None
    };

    ok_json(&Me {
        id: caller.primary_id(),
        name: &caller.name,
        role: caller.role,
        permissions: caller.role.permissions(),
        can_access_report_workflow: app
            .roles
            .can_access_report_workflow(caller.id_by_oa.as_deref(), caller.raw_id.as_deref()),
        can_view_stats: app.roles.has_permission(
            caller.id_by_oa.as_deref(),
            caller.raw_id.as_deref(),
            Permission::ViewStats,
        ),
        tdp,
    })
}
