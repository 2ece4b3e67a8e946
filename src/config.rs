use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use tracing_subscriber::EnvFilter;

use crate::http_client::RetryPolicy;

pub const DEFAULT_SEASON: &str = "2025-26";
pub const DEFAULT_SNAPSHOT_PATH: &str = "nba_data.json";
// Europe/Istanbul has been fixed at UTC+3 since 2016.
const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

/// Stderr logging for the command-line tools. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,hoops_terminal=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub season: String,
    pub snapshot_path: PathBuf,
    pub quarter_cache_days: u32,
    pub utc_offset_hours: i32,
    pub retry: RetryPolicy,
}

impl CollectConfig {
    pub fn from_env() -> Self {
        let max_attempts = env_parse::<u32>("FETCH_MAX_ATTEMPTS")
            .unwrap_or(3)
            .clamp(1, 10);
        let pacing_ms = env_parse::<u64>("FETCH_PACING_MS")
            .unwrap_or(400)
            .min(10_000);
        Self {
            season: env_string("NBA_SEASON").unwrap_or_else(|| DEFAULT_SEASON.to_string()),
            snapshot_path: snapshot_path_from_env(),
            quarter_cache_days: env_parse::<u32>("QUARTER_CACHE_DAYS")
                .unwrap_or(120)
                .clamp(1, 200),
            utc_offset_hours: utc_offset_from_env(),
            retry: RetryPolicy {
                max_attempts,
                pacing: Duration::from_millis(pacing_ms),
                ..RetryPolicy::default()
            },
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&offset(self.utc_offset_hours))
    }
}

pub fn snapshot_path_from_env() -> PathBuf {
    env_string("SNAPSHOT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH))
}

pub fn snapshot_poll_interval() -> Duration {
    Duration::from_secs(env_parse::<u64>("SNAPSHOT_POLL_SECS").unwrap_or(2).max(1))
}

fn utc_offset_from_env() -> i32 {
    env_parse::<i32>("SNAPSHOT_UTC_OFFSET_HOURS")
        .unwrap_or(DEFAULT_UTC_OFFSET_HOURS)
        .clamp(-12, 14)
}

pub fn offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// `--key=value` or `--key value` from the process arguments.
pub fn arg_value(args: &[String], key: &str) -> Option<String> {
    let prefix = format!("--{key}=");
    let flag = format!("--{key}");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
