use std::fs::OpenOptions;

use actix_web::{web, App, HttpServer};
use migration::MigratorTrait as _;
use sea_orm::Database;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

mod config;
mod error;
mod utils;

mod entity;
mod attendance;
mod payroll;
mod import;
mod pages;

/// Spreadsheet uploads can be large; everything else stays well below this.
const PAYLOAD_LIMIT: usize = 16 * 1024 * 1024;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(config::trace_log_path())?;

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_line_number(true)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(log_file)
                .with_filter(filter::LevelFilter::from_level(Level::TRACE))
        );

    tracing::subscriber::set_global_default(subscriber)?;

    let config::Config {
        host_address,
        database_opt,
        attendance_policy,
        run_migrations,
    } = config::load()?;

    let connection = Database::connect(database_opt).await?;
    if run_migrations {
        info!("Applying pending migrations");
        migration::Migrator::up(&connection, None).await?;
    }

    let database = web::Data::new(connection);
    let attendance_policy = web::Data::new(attendance_policy);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(database.clone())
            .app_data(attendance_policy.clone())
            .app_data(web::JsonConfig::default().limit(PAYLOAD_LIMIT))
            .app_data(web::PayloadConfig::new(PAYLOAD_LIMIT))
            .wrap(TracingLogger::default())
            .configure(pages::config)
    });

    info!(%host_address, "Starting server");

    server
        .bind(host_address)?
        .run().await?;

    Ok(())
}
