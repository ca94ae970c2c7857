// src/handlers/tdp.rs
use astra::Request;
use log::info;

use crate::app::App;
use crate::auth::{Caller, Permission};
use crate::db::tdp;
use crate::domain::tdp::{NewTdp, TdpPatch};
use crate::errors::ServerError;
use crate::handlers::read_json;
use crate::ids::{new_id, now_millis};
use crate::responses::{json_response, ok_json, ResultResp};

pub fn list_tdps(app: &App, caller: &Caller) -> ResultResp {
    caller.require(Permission::ViewAllReports)?;
    let all = app.db.with_conn(|conn| tdp::list_tdps(conn))?;
    ok_json(&all)
}

pub fn create_tdp(mut req: Request, app: &App, caller: &Caller) -> ResultResp {
    caller.require_staff()?;
    let input: NewTdp = read_json(&mut req, app.config.max_body_bytes)?;
    input.validate()?;

    let record = input.into_tdp(new_id(), now_millis());
    app.db.with_conn(|conn| tdp::insert_tdp(conn, &record))?;

    info!("tdp {} '{}' created by {}", record.id, record.name, caller.actor().identity);
    json_response(201, &record, "Created")
}

pub fn update_tdp(mut req: Request, app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require_staff()?;
    let patch: TdpPatch = read_json(&mut req, app.config.max_body_bytes)?;

    let updated = app.db.with_conn(|conn| tdp::update_tdp(conn, id, patch))?;
    ok_json(&updated)
}

pub fn delete_tdp(app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require_staff()?;
    app.db.with_conn(|conn| tdp::delete_tdp(conn, id))?;

    info!("tdp {id} deleted by {}", caller.actor().identity);
    ok_json(&serde_json::json!({ "id": id }))
}

/// `GET /api/tdp/{id}`
pub fn get_tdp(app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require(Permission::ViewAllReports)?;
    let found = app
        .db
        .with_conn(|conn| tdp::get_tdp(conn, id))?
        .ok_or_else(|| ServerError::NotFoundMsg(format!("TDP {id}")))?;
    ok_json(&found)
}
