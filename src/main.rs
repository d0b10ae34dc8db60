use crate::app::AppState;
use crate::config::Config;
use astra::Server;
use clap::Parser;

mod app;
mod catalog;
mod chat;
mod config;
mod domain;
mod errors;
mod ledger;
mod logger;
mod responses;
mod router;

#[cfg(test)]
mod tests;

fn main() {
    let config = Config::parse();
    logger::init_logger(config.verbose, config.log_json);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "configuration rejected");
        eprintln!("❌ {e}");
        std::process::exit(1);
    }

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to build chat client");
            std::process::exit(1);
        }
    };

    // Load the catalog up front so a missing file fails the deploy, not the
    // first visitor.
    if let Err(e) = state.catalog.reload() {
        tracing::error!(error = %e, "catalog could not be loaded");
        std::process::exit(1);
    }

    tracing::info!(addr = %config.bind, workers = config.workers, "starting server");
    let server = Server::bind(&config.bind).max_workers(config.workers);

    let result = server.serve(move |req, _info| router::respond(req, &state));

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down cleanly");
}
