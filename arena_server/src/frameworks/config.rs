use crate::domain::Tuning;
use crate::domain::errors::InvalidTuning;
use crate::use_cases::ServerSettings;
use std::{
    env,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("ARENA_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080)
}

pub fn bind_address() -> IpAddr {
    env::var("ARENA_SERVER_BIND")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub fn tick_interval() -> Duration {
    let millis = env::var("ARENA_TICK_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(100);
    Duration::from_millis(millis)
}

pub fn diagnostic_interval() -> Duration {
    let secs = env::var("ARENA_DIAGNOSTIC_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(60);
    Duration::from_secs(secs)
}

pub fn tuning_path() -> Option<PathBuf> {
    env::var_os("ARENA_TUNING_PATH").map(PathBuf::from)
}

pub const EVENT_QUEUE_CAPACITY: usize = 1024;
pub const CONNECTION_QUEUE_CAPACITY: usize = 32;
// ~5 s of missed snapshots at the default tick rate.
pub const MAX_DROPPED_SNAPSHOTS: u32 = 50;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] InvalidTuning),
}

/// Parses a TOML tuning document. Every table and key is optional.
pub fn parse_tuning(text: &str) -> Result<Tuning, TuningError> {
    let tuning: Tuning = toml::from_str(text)?;
    tuning.validate()?;
    Ok(tuning)
}

pub fn load_tuning_file(path: &Path) -> Result<Tuning, TuningError> {
    let text = std::fs::read_to_string(path).map_err(|source| TuningError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tuning(&text)
}

/// Defaults unless `ARENA_TUNING_PATH` names a file.
pub fn load_tuning() -> Result<Tuning, TuningError> {
    match tuning_path() {
        Some(path) => load_tuning_file(&path),
        None => Ok(Tuning::default()),
    }
}

pub fn server_settings() -> Result<ServerSettings, TuningError> {
    Ok(ServerSettings {
        tuning: load_tuning()?,
        tick_interval: tick_interval(),
        diagnostic_interval: diagnostic_interval(),
        event_queue_capacity: EVENT_QUEUE_CAPACITY,
        connection_queue_capacity: CONNECTION_QUEUE_CAPACITY,
        max_dropped_snapshots: MAX_DROPPED_SNAPSHOTS,
    })
}
