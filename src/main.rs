use crate::api::HttpListingSource;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::responses::html_error_response;
use crate::router::{handle, App};
use astra::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod forms;
mod responses;
mod router;
mod search;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let source = match HttpListingSource::new(&config.api_base, config.api_timeout) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "could not build the properties API client");
            std::process::exit(1);
        }
    };

    let app = App::new(db, source);
    info!(addr = %config.addr, api = app.source.base_url(), "starting server");

    let server = Server::bind(&config.addr).max_workers(config.workers);
    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
        std::process::exit(1);
    }

    info!("server shut down cleanly");
}
