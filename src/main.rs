use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod attendance;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod roster;
mod routes;
mod state;
mod store;
mod utils;

use crate::docs::ApiDoc;
use config::{Config, StoreBackend};
use db::init_db;
use roster::{MemoryRoster, MySqlRoster, RosterSource};
use state::AppState;
use store::{AttendanceStore, MemoryAttendanceStore, MySqlAttendanceStore};
use tracing::{info, warn};
use tracing_appender::rolling;
use utils::clock::{Clock, SystemClock};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn build_backends(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<(Arc<dyn AttendanceStore>, Arc<dyn RosterSource>)> {
    match config.store_backend {
        StoreBackend::Memory => {
            let roster = match &config.roster_path {
                Some(path) => MemoryRoster::from_json_file(path)?,
                None => {
                    warn!("ROSTER_PATH not set, starting with an empty roster");
                    MemoryRoster::default()
                }
            };
            Ok((Arc::new(MemoryAttendanceStore::new(clock)), Arc::new(roster)))
        }
        StoreBackend::MySql => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set when STORE_BACKEND=mysql"))?;
            let pool = init_db(url, config.store_timeout).await?;
            Ok((
                Arc::new(MySqlAttendanceStore::new(pool.clone(), clock)),
                Arc::new(MySqlRoster::new(pool)),
            ))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "attendance.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = ?config.store_backend, addr = %config.server_addr, "Server starting...");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (store, roster) = build_backends(&config, clock.clone()).await?;

    let server_addr = config.server_addr.clone();
    let state = AppState::build(config, store, roster, clock);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                // wildcard {_:.*} so the UI's JS/CSS assets resolve
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .configure(|cfg| state.register(cfg))
            .configure(|cfg| routes::configure(cfg, &state.config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
