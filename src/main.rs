use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::errors::ServerError;
use crate::router::handle;
use crate::state::AppState;
use astra::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod search;
mod state;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "nyc_deal_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }

    tracing::info!("server shut down cleanly");
}

fn run() -> Result<(), ServerError> {
    let cfg = AppConfig::from_env()?;

    let db = Database::new(cfg.database_path.clone());
    init_db(&db)?;

    let state = AppState::from_config(&cfg, db)?;

    tracing::info!(addr = %cfg.bind_addr, model = %cfg.llm.model, "starting server");

    Server::bind(&cfg.bind_addr)
        .max_workers(cfg.max_workers)
        .serve(move |req, _info| match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => responses::error_to_response(err),
        })
        .map_err(|e| {
            tracing::error!(error = %e, "server ended with error");
            ServerError::InternalError
        })
}
