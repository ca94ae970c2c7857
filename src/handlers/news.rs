// src/handlers/news.rs
use astra::Request;

use crate::app::App;
use crate::auth::Caller;
use crate::db::news;
use crate::domain::news::{News, NewsData, NewsPatch};
use crate::errors::ServerError;
use crate::handlers::{query_number, query_params, read_json};
use crate::ids::{new_id, now_millis};
use crate::responses::{json_response, ok_json, ResultResp};

const DEFAULT_LIMIT: u32 = 20;

pub fn list_news(req: &Request, app: &App) -> ResultResp {
    let params = query_params(req);
    let limit = query_number(&params, "limit")?.unwrap_or(DEFAULT_LIMIT).max(1);
    let items = app.db.with_conn(|conn| news::list_news(conn, limit))?;
    ok_json(&items)
}

pub fn get_news(app: &App, id: &str) -> ResultResp {
    let item = app
        .db
        .with_conn(|conn| news::get_news(conn, id))?
        .ok_or_else(|| ServerError::NotFoundMsg(format!("news {id}")))?;
    ok_json(&item)
}

pub fn create_news(mut req: Request, app: &App, caller: &Caller) -> ResultResp {
    caller.require_staff()?;
    let data: NewsData = read_json(&mut req, app.config.max_body_bytes)?;
    data.validate()?;

    let item = News {
        id: new_id(),
        title: data.title,
        thumbnail: data.thumbnail,
        content: data.content,
        images: data.images,
        created_at: now_millis(),
    };
    app.db.with_conn(|conn| news::insert_news(conn, &item))?;
    json_response(201, &item, "Created")
}

pub fn update_news(mut req: Request, app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require_staff()?;
    let patch: NewsPatch = read_json(&mut req, app.config.max_body_bytes)?;
    let item = app.db.with_conn(|conn| news::update_news(conn, id, patch))?;
    ok_json(&item)
}

pub fn delete_news(app: &App, caller: &Caller, id: &str) -> ResultResp {
    caller.require_staff()?;
    app.db.with_conn(|conn| news::delete_news(conn, id))?;
    ok_json(&serde_json::json!({ "id": id }))
}
