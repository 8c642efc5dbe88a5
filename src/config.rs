use std::{env, net::{SocketAddr, ToSocketAddrs as _}};

use rust_decimal::Decimal;
use sea_orm::ConnectOptions;
use thiserror::Error;
use tracing::info;

use crate::attendance::AttendancePolicy;

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub attendance_policy: AttendancePolicy,

    pub run_migrations: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment `{0}` is required to be set")]
    Missing(&'static str),
    #[error("environment `{name}` is not valid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

pub fn load() -> Result<Config, ConfigError> {
    Ok(Config {
        host_address: load_host_address()?,
        database_opt: load_database_opt()?.into(),
        attendance_policy: load_attendance_policy()?,
        run_migrations: load_run_migrations()?,
    })
}

/// Name of the file the TRACE level log layer appends to.
pub fn trace_log_path() -> String {
    env::var("TRACE_LOG").unwrap_or_else(|_| "trace.log".to_string())
}

fn load_host_address() -> Result<SocketAddr, ConfigError> {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .map_err(|err| ConfigError::Invalid { name: "HOST_ADDRESS", reason: err.to_string() })?
        .next()
        .ok_or_else(|| ConfigError::Invalid { name: "HOST_ADDRESS", reason: "unable to resolve host".to_string() })
}

fn load_database_opt() -> Result<impl Into<ConnectOptions>, ConfigError> {
    info!("Loading environment `DATABASE_URL`");

    env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))
}

fn load_attendance_policy() -> Result<AttendancePolicy, ConfigError> {
    info!("Loading environment `ATTENDANCE_LATE_WEIGHT`");

    let Ok(var) = env::var("ATTENDANCE_LATE_WEIGHT") else {
        return Ok(AttendancePolicy::default());
    };

    parse_late_weight(&var).map(|late_weight| AttendancePolicy { late_weight })
}

fn parse_late_weight(var: &str) -> Result<Decimal, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid { name: "ATTENDANCE_LATE_WEIGHT", reason };

    let weight = var.trim().parse::<Decimal>().map_err(|err| invalid(err.to_string()))?;
    if weight < Decimal::ZERO || weight > Decimal::ONE {
        return Err(invalid(format!("{weight} is outside 0..=1")));
    }

    Ok(weight)
}

fn load_run_migrations() -> Result<bool, ConfigError> {
    info!("Loading environment `RUN_MIGRATIONS`");

    match env::var("RUN_MIGRATIONS") {
        Err(_) => Ok(true),
        Ok(var) => var.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "RUN_MIGRATIONS",
            reason: format!("`{var}` is neither `true` nor `false`"),
        }),
    }
}
