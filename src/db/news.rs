// src/db/news.rs
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::news::{News, NewsPatch};
use crate::errors::ServerError;

const NEWS_COLUMNS: &str = "id, title, thumbnail, content, images, created_at";

fn row_to_news(r: &Row<'_>) -> rusqlite::Result<News> {
    let images: String = r.get(4)?;
    Ok(News {
        id: r.get(0)?,
        title: r.get(1)?,
        thumbnail: r.get(2)?,
        content: r.get(3)?,
        images: serde_json::from_str(&images)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        created_at: r.get(5)?,
    })
}

fn encode_images(images: &[String]) -> Result<String, ServerError> {
    serde_json::to_string(images).map_err(|e| ServerError::DbError(format!("encode images failed: {e}")))
}

pub fn insert_news(conn: &Connection, news: &News) -> Result<(), ServerError> {
    conn.execute(
        "insert into news (id, title, thumbnail, content, images, created_at)
         values (?, ?, ?, ?, ?, ?)",
        params![
            news.id,
            news.title,
            news.thumbnail,
            news.content,
            encode_images(&news.images)?,
            news.created_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert news failed: {e}")))?;
    Ok(())
}

pub fn list_news(conn: &Connection, limit: u32) -> Result<Vec<News>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {NEWS_COLUMNS} from news order by created_at desc, id limit ?"
        ))
        .map_err(|e| ServerError::DbError(format!("prepare list news failed: {e}")))?;

    let rows = stmt
        .query_map(params![limit], row_to_news)
        .map_err(|e| ServerError::DbError(format!("list news failed: {e}")))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::DbError(format!("read news row failed: {e}")))
}

pub fn get_news(conn: &Connection, id: &str) -> Result<Option<News>, ServerError> {
    conn.query_row(
        &format!("select {NEWS_COLUMNS} from news where id = ?"),
        params![id],
        row_to_news,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("get news failed: {e}")))
}

pub fn update_news(conn: &mut Connection, id: &str, patch: NewsPatch) -> Result<News, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let mut news = get_news(&tx, id)?.ok_or(ServerError::NotFound)?;
    patch.apply(&mut news)?;

    tx.execute(
        "update news set title = ?, thumbnail = ?, content = ?, images = ? where id = ?",
        params![
            news.title,
            news.thumbnail,
            news.content,
            encode_images(&news.images)?,
            news.id,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("update news failed: {e}")))?;

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
    Ok(news)
}

pub fn delete_news(conn: &Connection, id: &str) -> Result<(), ServerError> {
    let deleted = conn
        .execute("delete from news where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete news failed: {e}")))?;
    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}
