use crate::app::App;
use crate::auth::roles::RoleConfig;
use crate::auth::identity::{HEADER_ID_BY_OA, HEADER_NAME};
use crate::config::AppConfig;
use crate::db::init_db;
use crate::router::respond;
use crate::storage::LocalDiskStore;
use astra::{Body, Request, Response};
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN: &str = "admin-1";
pub const MODERATOR: &str = "mod-1";
pub const LEADER_A: &str = "leader-a";
pub const LEADER_B: &str = "leader-b";

/// App over a fresh file database and object store; both live as long as `dir`.
pub struct TestApp {
    pub app: App,
    pub dir: TempDir,
}

pub fn test_config(dir: &TempDir) -> AppConfig {
    let mut roles = RoleConfig::default();
    roles.admin_ids.insert(ADMIN.to_string());
    roles.mod_ids.insert(MODERATOR.to_string());
    roles.leader_ids.insert(LEADER_A.to_string());
    roles.leader_ids.insert(LEADER_B.to_string());

    AppConfig {
        db_path: dir.path().join("test.sqlite3").to_string_lossy().into_owned(),
        storage_dir: dir.path().join("storage").to_string_lossy().into_owned(),
        public_base_url: "https://files.test/".to_string(),
        roles,
        ..AppConfig::default()
    }
}

/// Initialize a fresh test DB using the production schema
pub fn init_test_app_with(config: AppConfig, dir: TempDir) -> TestApp {
    let store = LocalDiskStore::new(&config.storage_dir, config.public_base_url.clone());
    let app = App::new(config, Arc::new(store));

    init_db(&app.db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    TestApp { app, dir }
}

pub fn init_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&dir);
    init_test_app_with(config, dir)
}

pub fn request(method: &str, uri: &str, caller: Option<&str>, body: Option<Value>) -> Request {
    let name = caller.map(|id| format!("User {id}"));
    request_named(method, uri, caller, name.as_deref(), body)
}

/// Like [`request`], with an explicit `X-Zalo-Name` (sent as raw UTF-8).
pub fn request_named(
    method: &str,
    uri: &str,
    caller: Option<&str>,
    name: Option<&str>,
    body: Option<Value>,
) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(id) = caller {
        builder = builder.header(HEADER_ID_BY_OA, id);
    }
    if let Some(name) = name {
        builder = builder.header(HEADER_NAME, http::HeaderValue::from_bytes(name.as_bytes()).unwrap());
    }
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

pub fn read_text(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn read_bytes(resp: Response) -> Vec<u8> {
    let mut body = Vec::new();
    resp.into_body().reader().read_to_end(&mut body).unwrap();
    body
}

/// Sends a request through the router and decodes the JSON envelope.
pub fn send(t: &TestApp, method: &str, uri: &str, caller: Option<&str>, body: Option<Value>) -> (u16, Value) {
    send_request(t, request(method, uri, caller, body))
}

pub fn send_request(t: &TestApp, req: Request) -> (u16, Value) {
    let resp = respond(req, &t.app);
    let status = resp.status().as_u16();
    let text = read_text(resp);
    let value = serde_json::from_str(&text).unwrap_or_else(|e| panic!("not JSON ({e}): {text}"));
    (status, value)
}

/// Creates an active TDP through the API and returns its id.
pub fn create_tdp(t: &TestApp, name: &str, leader: &str) -> String {
    let (status, v) = send(
        t,
        "POST",
        "/api/tdp",
        Some(ADMIN),
        Some(serde_json::json!({ "name": name, "leaderIdentity": leader, "leaderName": format!("Tổ trưởng {name}") })),
    );
    assert_eq!(status, 201, "create tdp failed: {v}");
    v["data"]["id"].as_str().unwrap().to_string()
}
