// src/db/feedbacks.rs
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use crate::domain::feedback::{Feedback, Location, STATUS_HANDLED};
use crate::errors::ServerError;

const FEEDBACK_COLUMNS: &str = "id, title, content, full_name, address, phone_number, type,
     image_urls, latitude, longitude, response, status, creation_time, response_time";

fn row_to_feedback(r: &Row<'_>) -> rusqlite::Result<Feedback> {
    let image_urls: String = r.get(7)?;
    let latitude: Option<String> = r.get(8)?;
    let longitude: Option<String> = r.get(9)?;

    Ok(Feedback {
        id: r.get(0)?,
        title: r.get(1)?,
        content: r.get(2)?,
        full_name: r.get(3)?,
        address: r.get(4)?,
        phone_number: r.get(5)?,
        kind: r.get(6)?,
        image_urls: serde_json::from_str(&image_urls)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?,
        location: match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Location { latitude, longitude }),
            _ => None,
        },
        response: r.get(10)?,
        status: r.get(11)?,
        creation_time: r.get(12)?,
        response_time: r.get(13)?,
    })
}

pub fn insert_feedback(conn: &Connection, feedback: &Feedback, submitter: &str) -> Result<(), ServerError> {
    let image_urls = serde_json::to_string(&feedback.image_urls)
        .map_err(|e| ServerError::DbError(format!("encode image urls failed: {e}")))?;
    let (latitude, longitude) = match &feedback.location {
        Some(loc) => (Some(loc.latitude.as_str()), Some(loc.longitude.as_str())),
        None => (None, None),
    };

    conn.execute(
        "insert into feedbacks (id, title, content, full_name, address, phone_number, type,
                                image_urls, latitude, longitude, response, status, submitter,
                                creation_time, response_time)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            feedback.id,
            feedback.title,
            feedback.content,
            feedback.full_name,
            feedback.address,
            feedback.phone_number,
            feedback.kind,
            image_urls,
            latitude,
            longitude,
            feedback.response,
            feedback.status,
            submitter,
            feedback.creation_time,
            feedback.response_time,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert feedback failed: {e}")))?;
    Ok(())
}

/// Counts feedbacks from `submitter` created at or after `since` (epoch millis).
pub fn count_feedbacks_since(conn: &Connection, submitter: &str, since: i64) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*) from feedbacks where submitter = ? and creation_time >= ?",
        params![submitter, since],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count feedbacks failed: {e}")))
}

/// Inserts `feedback` unless `submitter` already sent `max_per_window`
/// feedbacks in the last `window_ms`. Count and insert share one write transaction.
pub fn insert_feedback_limited(
    conn: &mut Connection,
    feedback: &Feedback,
    submitter: &str,
    max_per_window: u32,
    window_ms: i64,
) -> Result<(), ServerError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let recent = count_feedbacks_since(&tx, submitter, feedback.creation_time - window_ms)?;
    if recent >= i64::from(max_per_window) {
        return Err(ServerError::RateLimited);
    }
    insert_feedback(&tx, feedback, submitter)?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
    Ok(())
}

/// One page of feedbacks, newest first.
pub fn list_feedbacks(conn: &Connection, limit: u32, page: u32) -> Result<Vec<Feedback>, ServerError> {
    let offset = i64::from(limit) * i64::from(page);
    let mut stmt = conn
        .prepare(&format!(
            "select {FEEDBACK_COLUMNS} from feedbacks
             order by creation_time desc, id
             limit ? offset ?"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare list feedbacks failed: {e}")))?;

    let rows = stmt
        .query_map(params![limit, offset], row_to_feedback)
        .map_err(|e| ServerError::DbError(format!("list feedbacks failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::DbError(format!("read feedback row failed: {e}")))
}

pub fn get_feedback(conn: &Connection, id: &str) -> Result<Option<Feedback>, ServerError> {
    conn.query_row(
        &format!("select {FEEDBACK_COLUMNS} from feedbacks where id = ?"),
        params![id],
        row_to_feedback,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("get feedback failed: {e}")))
}

pub fn reply_feedback(conn: &Connection, id: &str, response: &str, now: i64) -> Result<Feedback, ServerError> {
    let updated = conn
        .execute(
            "update feedbacks set response = ?, response_time = ?, status = ? where id = ?",
            params![response, now, STATUS_HANDLED, id],
        )
        .map_err(|e| ServerError::DbError(format!("reply feedback failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    get_feedback(conn, id)?.ok_or(ServerError::NotFound)
}
