mod api_conversion;
mod api_types;
mod config;
mod db;
mod error;
mod handlers;
mod logging;
mod routes;
mod validation;

use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use rusqlite::Connection;

use crate::api_types::{MonteCarloRequest, MonteCarloResponse};
use crate::config::{Cli, Command, Settings};
use crate::db::DbConn;
use crate::handlers::AppState;

fn open_db(path: &Path) -> color_eyre::Result<DbConn> {
    let conn = Connection::open(path)
        .wrap_err_with(|| format!("failed to open database {}", path.display()))?;
    db::init_db(&conn).wrap_err("failed to initialize database schema")?;
    Ok(Arc::new(Mutex::new(conn)))
}

async fn serve(settings: &Settings) -> color_eyre::Result<()> {
    let state = AppState {
        db: open_db(&settings.database)?,
        limits: settings.limits(),
        timeout: settings.timeout(),
    };

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .wrap_err_with(|| format!("failed to bind {}", settings.bind))?;
    tracing::info!(
        address = %listener.local_addr()?,
        database = %settings.database.display(),
        max_simulations = state.limits.max_simulations,
        max_forecast_months = state.limits.max_forecast_months,
        "etfcast server listening"
    );

    axum::serve(listener, routes::app(state)).await?;
    Ok(())
}

fn simulate(settings: &Settings, request_path: &Path) -> color_eyre::Result<()> {
    let body = std::fs::read_to_string(request_path)
        .wrap_err_with(|| format!("failed to read {}", request_path.display()))?;
    let req: MonteCarloRequest =
        serde_json::from_str(&body).wrap_err("request file is not a valid projection request")?;

    let resolved = api_conversion::to_projection_request(&req)?;
    let db = open_db(&settings.database)?;
    let result = handlers::project_blocking(db, resolved, &settings.limits())?;

    let response = MonteCarloResponse::from(result);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init_logging(&cli.settings.log_level)?;

    match cli.subcommand() {
        Command::Serve => serve(&cli.settings).await?,
        Command::Simulate { request } => {
            let settings = cli.settings.clone();
            tokio::task::spawn_blocking(move || simulate(&settings, &request)).await??;
        }
    }

    tracing::info!("etfcast shutting down");
    Ok(())
}
