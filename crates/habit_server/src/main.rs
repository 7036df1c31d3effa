//! `habit-server` entry point.

use habit_core::db::{open_db, open_db_in_memory};
use habit_core::{init_logging, SystemClock};
use habit_server::{build_router, AppState, DbLocation, ServerConfig};
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("habit-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let conn = match &config.db {
        DbLocation::File(path) => open_db(path)?,
        DbLocation::Memory => open_db_in_memory()?,
    };
    let router = build_router(AppState::new(conn, SystemClock), config.cors);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_listen module=server status=ok addr={} cors={}",
        listener.local_addr()?,
        config.cors
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_listen module=server status=error error={err}");
    }
}
