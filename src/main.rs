use crate::app::App;
use crate::config::AppConfig;
use crate::db::init_db;
use crate::router::respond;
use astra::Server;
use log::{error, info};
use std::net::SocketAddr;

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod handlers;
mod ids;
mod responses;
mod router;
mod sanitize;
mod spreadsheets;
mod storage;
mod upload;
mod workflow;

#[cfg(test)]
mod tests;

fn main() {
    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration failed: {e}");
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("invalid bind_addr '{}': {e}", config.bind_addr);
            std::process::exit(1);
        }
    };
    let max_workers = config.max_workers;
    let schema_path = config.schema_path.clone();

    let app = App::from_config(config);

    if let Err(e) = init_db(&app.db, &schema_path) {
        error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    info!("Starting server at http://{addr} ({max_workers} workers)");

    let server = Server::bind(&addr).max_workers(max_workers);
    let result = server.serve(move |req, _info| respond(req, &app));

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
