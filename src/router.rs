use crate::app::App;
use crate::auth::Caller;
use crate::errors::ServerError;
use crate::handlers::exports::ExportKind;
use crate::handlers::{exports, feedback, me, news, reports, tdp, upload};
use crate::responses::{error_to_response, preflight_response, ResultResp};
use astra::{Request, Response};
use log::{debug, error};

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    if method == "OPTIONS" {
        return preflight_response();
    }
    if path == "/upload" {
        return Ok(upload::upload_images(req, app));
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let caller = Caller::from_request(&req, &app.roles);

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["api", "me"]) => me::get_me(app, &caller),

        ("GET", ["api", "tdp"]) => tdp::list_tdps(app, &caller),
        ("POST", ["api", "tdp"]) => tdp::create_tdp(req, app, &caller),
        ("GET", ["api", "tdp", id]) => tdp::get_tdp(app, &caller, id),
        ("PATCH", ["api", "tdp", id]) => tdp::update_tdp(req, app, &caller, id),
        ("DELETE", ["api", "tdp", id]) => tdp::delete_tdp(app, &caller, id),

        ("GET", ["api", "reports"]) => reports::list_reports(&req, app, &caller),
        ("GET", ["api", "reports", "stats"]) => reports::report_stats(app, &caller),
        ("POST", ["api", "reports", "assign"]) => reports::assign_reports(req, app, &caller),
        ("GET", ["api", "reports", id]) => reports::get_report(app, &caller, id),
        ("DELETE", ["api", "reports", id]) => reports::delete_report(app, &caller, id),
        ("POST", ["api", "reports", id, "status"]) => reports::update_status(req, app, &caller, id),
        ("POST", ["api", "reports", id, "answers"]) => reports::submit_answers(req, app, &caller, id),

        ("GET", ["api", "exports", "tdp"]) => exports::export_tdp(&req, app, &caller),
        ("GET", ["api", "exports", kind]) => match ExportKind::parse(kind) {
            Some(kind) => exports::export(app, &caller, kind),
            None => Err(ServerError::NotFound),
        },

        ("GET", ["api", "feedbacks"]) => feedback::list_feedbacks(&req, app),
        ("POST", ["api", "feedbacks"]) => feedback::create_feedback(req, app, &caller),
        ("GET", ["api", "feedbacks", id]) => feedback::get_feedback(app, id),
        ("POST", ["api", "feedbacks", id, "reply"]) => feedback::reply_feedback(req, app, &caller, id),
        ("GET", ["api", "feedback-types"]) => feedback::list_feedback_types(),

        ("GET", ["api", "news"]) => news::list_news(&req, app),
        ("POST", ["api", "news"]) => news::create_news(req, app, &caller),
        ("GET", ["api", "news", id]) => news::get_news(app, id),
        ("PATCH", ["api", "news", id]) => news::update_news(req, app, &caller, id),
        ("DELETE", ["api", "news", id]) => news::delete_news(app, &caller, id),

        _ => Err(ServerError::NotFound),
    }
}

/// `handle`, with errors turned into JSON envelopes.
pub fn respond(req: Request, app: &App) -> Response {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => {
            if err.is_server_fault() {
                error!("{method} {path} failed: {err}");
            } else {
                debug!("{method} {path} rejected: {err}");
            }
            error_to_response(&err)
        }
    }
}
