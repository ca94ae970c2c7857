// src/handlers/feedback.rs
use astra::Request;
use log::{info, warn};

use crate::app::App;
use crate::auth::Caller;
use crate::db::feedbacks;
use crate::domain::feedback::{feedback_types, FeedbackReply, NewFeedback};
use crate::errors::ServerError;
use crate::handlers::{query_number, query_params, read_json};
use crate::ids::{new_id, now_millis};
use crate::responses::{json_response, ok_json, ResultResp};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// `GET /api/feedbacks?limit=&page=`
pub fn list_feedbacks(req: &Request, app: &App) -> ResultResp {
    let params = query_params(req);
    let limit = query_number(&params, "limit")?
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = query_number(&params, "page")?.unwrap_or(0);

    let items = app
        .db
        .with_conn(|conn| feedbacks::list_feedbacks(conn, limit, page))?;
    ok_json(&items)
}

pub fn get_feedback(app: &App, id: &str) -> ResultResp {
    let found = app
        .db
        .with_conn(|conn| feedbacks::get_feedback(conn, id))?
        .ok_or_else(|| ServerError::NotFoundMsg(format!("feedback {id}")))?;
    ok_json(&found)
}

pub fn create_feedback(mut req: Request, app: &App, caller: &Caller) -> ResultResp {
    let input: NewFeedback = read_json(&mut req, app.config.max_body_bytes)?;
    input.validate()?;

    let submitter = input.submitter_key(caller.primary_id());
    let feedback = input.into_feedback(new_id(), now_millis());
    let limit = &app.config.feedback_rate_limit;

    app.db
        .with_conn(|conn| {
            feedbacks::insert_feedback_limited(
                conn,
                &feedback,
                &submitter,
                limit.max_per_window,
                limit.window_secs * 1000,
            )
        })
        .inspect_err(|e| {
            if matches!(e, ServerError::RateLimited) {
                warn!("feedback rate limit hit for {submitter}");
            }
        })?;

    info!("feedback {} received ({})", feedback.id, feedback.kind);
    json_response(201, &feedback, "Created")
}

pub fn reply_feedback(mut req: Request, app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require_staff()?;
    let reply: FeedbackReply = read_json(&mut req, app.config.max_body_bytes)?;
    if reply.response.trim().is_empty() {
        return Err(ServerError::BadRequest("response is required".into()));
    }

    let updated = app
        .db
        .with_conn(|conn| feedbacks::reply_feedback(conn, id, &reply.response, now_millis()))?;
    ok_json(&updated)
}

pub fn list_feedback_types() -> ResultResp {
    ok_json(&feedback_types())
}
