// src/db/tdp.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::tdp::{Tdp, TdpPatch};
use crate::errors::ServerError;

const TDP_COLUMNS: &str = "id, name, leader_identity, leader_name, leader_phone, address,
     household_count, population_count, active, description, created_at";

fn row_to_tdp(r: &Row<'_>) -> rusqlite::Result<Tdp> {
    Ok(Tdp {
        id: r.get(0)?,
        name: r.get(1)?,
        leader_identity: r.get(2)?,
        leader_name: r.get(3)?,
        leader_phone: r.get(4)?,
        address: r.get(5)?,
        household_count: r.get(6)?,
        population_count: r.get(7)?,
        active: r.get(8)?,
        description: r.get(9)?,
        created_at: r.get(10)?,
    })
}

pub fn list_tdps(conn: &Connection) -> Result<Vec<Tdp>, ServerError> {
    let mut stmt = conn
        .prepare(&format!("select {TDP_COLUMNS} from tdp order by created_at, name"))
        .map_err(|e| ServerError::DbError(format!("prepare list tdp failed: {e}")))?;

    let rows = stmt
        .query_map([], row_to_tdp)
        .map_err(|e| ServerError::DbError(format!("list tdp failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::DbError(format!("read tdp row failed: {e}")))
}

pub fn get_tdp(conn: &Connection, id: &str) -> Result<Option<Tdp>, ServerError> {
    conn.query_row(
        &format!("select {TDP_COLUMNS} from tdp where id = ?"),
        params![id],
        row_to_tdp,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("get tdp failed: {e}")))
}

/// The active TDP led by any of the given identities.
pub fn find_active_by_leader(conn: &Connection, ids: &[&str]) -> Result<Option<Tdp>, ServerError> {
    for id in ids.iter().filter(|id| !id.is_empty()) {
        let found = conn
            .query_row(
                &format!(
                    "select {TDP_COLUMNS} from tdp
                     where leader_identity = ? and active = 1
                     order by created_at limit 1"
                ),
                params![id],
                row_to_tdp,
            )
            .optional()
            .map_err(|e| ServerError::DbError(format!("find tdp by leader failed: {e}")))?;
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

/// An active leader may only lead one active TDP.
fn ensure_leader_free(conn: &Connection, tdp: &Tdp) -> Result<(), ServerError> {
    if !tdp.active {
        return Ok(());
    }

    let clash: Option<String> = conn
        .query_row(
            "select name from tdp where leader_identity = ? and active = 1 and id <> ? limit 1",
            params![tdp.leader_identity, tdp.id],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("check tdp leader failed: {e}")))?;

    match clash {
        Some(other) => Err(ServerError::Conflict(format!(
            "leader {} already leads active TDP '{other}'",
            tdp.leader_identity
        ))),
        None => Ok(()),
    }
}

pub fn insert_tdp(conn: &Connection, tdp: &Tdp) -> Result<(), ServerError> {
    ensure_leader_free(conn, tdp)?;

    conn.execute(
        "insert into tdp (id, name, leader_identity, leader_name, leader_phone, address,
                          household_count, population_count, active, description, created_at)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            tdp.id,
            tdp.name,
            tdp.leader_identity,
            tdp.leader_name,
            tdp.leader_phone,
            tdp.address,
            tdp.household_count,
            tdp.population_count,
            tdp.active,
            tdp.description,
            tdp.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert tdp failed: {e}")))?;
    Ok(())
}

pub fn update_tdp(conn: &mut Connection, id: &str, patch: TdpPatch) -> Result<Tdp, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let mut tdp = get_tdp(&tx, id)?.ok_or(ServerError::NotFound)?;
    patch.apply(&mut tdp)?;
    ensure_leader_free(&tx, &tdp)?;

    tx.execute(
        "update tdp set name = ?, leader_identity = ?, leader_name = ?, leader_phone = ?,
                        address = ?, household_count = ?, population_count = ?, active = ?,
                        description = ?
         where id = ?",
        params![
            tdp.name,
            tdp.leader_identity,
            tdp.leader_name,
            tdp.leader_phone,
            tdp.address,
            tdp.household_count,
            tdp.population_count,
            tdp.active,
            tdp.description,
            tdp.id,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("update tdp failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
    Ok(tdp)
}

/// Deletes a TDP no report refers to. Referenced TDPs have to be deactivated instead.
pub fn delete_tdp(conn: &mut Connection, id: &str) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    if get_tdp(&tx, id)?.is_none() {
        return Err(ServerError::NotFound);
    }

    let referenced: i64 = tx
        .query_row(
            "select count(*) from reports where tdp_id = ?",
            params![id],
            |r| r.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("count tdp reports failed: {e}")))?;

    if referenced > 0 {
        return Err(ServerError::Conflict(format!(
            "TDP is referenced by {referenced} report(s); deactivate it instead"
        )));
    }

    tx.execute("delete from tdp where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete tdp failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
    Ok(())
}
