use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub aws: AwsConfig,
    pub fetch: FetchConfig,
    /// Path to the schedule YAML file.
    pub schedule_path: PathBuf,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            storage: StorageConfig::from_env(),
            aws: AwsConfig::from_env(),
            fetch: FetchConfig::from_env(),
            schedule_path: PathBuf::from(env_or("LINKMILL_SCHEDULE", "config/schedule.yml")),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  schedule: {}", self.schedule_path.display());
        tracing::info!(
            "  storage:  data_dir={}, rotate_max_kb={}",
            self.storage.data_dir.display(),
            self.storage.rotate_max_kb
        );
        tracing::info!(
            "  aws:      region={}, bucket={}",
            self.aws.region,
            self.aws.s3_bucket.as_deref().unwrap_or("(none)")
        );
        tracing::info!(
            "  fetch:    sources={}, timeout={}s",
            self.fetch.sources.len(),
            self.fetch.timeout_secs
        );
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// A TSV file larger than this is shelved as a compressed backup.
    pub rotate_max_kb: u64,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env_or("DATA_DIR", "data")),
            rotate_max_kb: env_u64("LINKMILL_ROTATE_MAX_KB", 80),
        }
    }

    pub fn rotate_max_bytes(&self) -> u64 {
        self.rotate_max_kb * 1024
    }
}

// ── AWS / S3 ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env() -> Self {
        Self {
            region: env_or("AWS_REGION", "us-east-1"),
            s3_bucket: env_opt("S3_BUCKET"),
            s3_prefix: env_opt("S3_PREFIX"),
            access_key_id: env_opt("AWS_ACCESS_KEY_ID"),
            secret_access_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            session_token: env_opt("AWS_SESSION_TOKEN"),
            endpoint_url: env_opt("AWS_ENDPOINT_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.s3_bucket.is_some()
    }
}

// ── Fetch ─────────────────────────────────────────────────────

/// One page to scrape, attributed to the service whose schedule governs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub service: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Pages to scrape, in declaration order. A service may list several.
    pub sources: Vec<Source>,
}

impl FetchConfig {
    fn from_env() -> Self {
        Self {
            user_agent: env_or("LINKMILL_USER_AGENT", "linkmill/0.1"),
            timeout_secs: env_u64("LINKMILL_TIMEOUT_SECS", 15),
            sources: parse_sources(&env_or("LINKMILL_SOURCES", "")),
        }
    }
}

/// Parse `LINKMILL_SOURCES`: comma-separated `service=url` entries.
/// Only the first `=` splits, so query strings survive intact.
fn parse_sources(raw: &str) -> Vec<Source> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            let (service, url) = entry.split_once('=')?;
            Some(Source {
                service: service.trim().to_string(),
                url: url.trim().to_string(),
            })
        })
        .collect()
}
