use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "BURROW_LISTEN_ADDR";
pub const DOMAIN_ENV: &str = "BURROW_DOMAIN";
pub const RATE_LIMIT_ENV: &str = "BURROW_RATE_LIMIT";
pub const MAX_CLIENTS_ENV: &str = "BURROW_MAX_CLIENTS";
pub const MAX_URL_LENGTH_ENV: &str = "BURROW_MAX_URL_LENGTH";
pub const CODE_LENGTH_ENV: &str = "BURROW_CODE_LENGTH";
pub const SNAPSHOT_PATH_ENV: &str = "BURROW_SNAPSHOT_PATH";
pub const PURGE_INTERVAL_ENV: &str = "BURROW_PURGE_INTERVAL_SECS";
pub const TRUST_FORWARDED_FOR_ENV: &str = "BURROW_TRUST_FORWARDED_FOR";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DOMAIN: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow", about = "Self-hosted URL shortener")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public base URL that short links are built on.
    #[arg(long, env = DOMAIN_ENV, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Shorten requests allowed per client per second.
    #[arg(long, env = RATE_LIMIT_ENV, default_value_t = 10)]
    pub rate_limit: u32,

    #[arg(long, env = MAX_CLIENTS_ENV, default_value_t = 100_000)]
    pub max_clients: u64,

    #[arg(long, env = MAX_URL_LENGTH_ENV, default_value_t = 1000)]
    pub max_url_length: usize,

    #[arg(long, env = CODE_LENGTH_ENV, default_value_t = 7)]
    pub code_length: usize,

    /// Snapshot file loaded at startup and written on shutdown.
    #[arg(long, env = SNAPSHOT_PATH_ENV)]
    pub snapshot_path: Option<PathBuf>,

    /// Seconds between sweeps of expired records.
    #[arg(long, env = PURGE_INTERVAL_ENV, default_value_t = 60)]
    pub purge_interval_secs: u64,

    /// Key rate limiting on `X-Forwarded-For`. Enable only behind a proxy
    /// that sets the header itself.
    #[arg(long, env = TRUST_FORWARDED_FOR_ENV)]
    pub trust_forwarded_for: bool,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}
