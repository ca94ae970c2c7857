pub mod connection;
pub mod feedbacks;
pub mod news;
pub mod reports;
pub mod tdp;

pub use connection::{init_db, Database};

/// In-memory connection carrying the production schema.
#[cfg(test)]
pub fn test_conn() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    connection::apply_schema(&conn, include_str!("../../sql/schema.sql")).unwrap();
    conn
}
