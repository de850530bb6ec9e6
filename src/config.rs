use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 120;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub aws_region: Option<String>,
    pub max_upload_bytes: usize,
    pub presign_expiry: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            s3_bucket: None,
            aws_region: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB as usize * 1024 * 1024,
            presign_expiry: Duration::from_secs(DEFAULT_PRESIGN_EXPIRY_SECS),
        }
    }
}

impl ServerConfig {
    /// Reads `PORT`, `DATABASE_URL`, `AWS_S3_BUCKET`, `AWS_REGION`,
    /// `MAX_UPLOAD_MB` and `PRESIGN_EXPIRY_SECS`.
    pub fn from_env() -> Self {
        let max_upload_mb = parse_or("MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB);
        Self {
            port: parse_or("PORT", DEFAULT_PORT),
            database_url: non_empty("DATABASE_URL"),
            s3_bucket: non_empty("AWS_S3_BUCKET"),
            aws_region: non_empty("AWS_REGION"),
            max_upload_bytes: upload_limit_bytes(max_upload_mb),
            presign_expiry: Duration::from_secs(parse_or(
                "PRESIGN_EXPIRY_SECS",
                DEFAULT_PRESIGN_EXPIRY_SECS,
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Reads `FILEDESK_API_URL` and `FILEDESK_SESSION_FILE`.
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty("FILEDESK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_file: non_empty("FILEDESK_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join("filedesk-session.json")),
        }
    }
}

/// Megabytes to bytes; limits that do not fit in `usize` fall back to the default.
fn upload_limit_bytes(max_upload_mb: u64) -> usize {
    max_upload_mb
        .checked_mul(1024 * 1024)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .unwrap_or_else(|| {
            log::warn!(
                "MAX_UPLOAD_MB {} is too large, using {}",
                max_upload_mb,
                DEFAULT_MAX_UPLOAD_MB
            );
            DEFAULT_MAX_UPLOAD_MB as usize * 1024 * 1024
        })
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match non_empty(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid value {:?} for {}, using {}", raw, key, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_everything_in_memory() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert!(config.database_url.is_none());
        assert!(config.s3_bucket.is_none());
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.presign_expiry, Duration::from_secs(120));
    }

    #[test]
    fn oversized_upload_limit_falls_back() {
        assert_eq!(upload_limit_bytes(1), 1024 * 1024);
        assert_eq!(upload_limit_bytes(u64::MAX), 10 * 1024 * 1024);
        assert_eq!(upload_limit_bytes(u64::MAX / 1024), 10 * 1024 * 1024);
    }

    #[test]
    fn unparsable_values_fall_back() {
        env::set_var("FILEDESK_TEST_BAD_NUMBER", "ten");
        assert_eq!(parse_or("FILEDESK_TEST_BAD_NUMBER", 7u64), 7);
        env::set_var("FILEDESK_TEST_GOOD_NUMBER", " 42 ");
        assert_eq!(parse_or("FILEDESK_TEST_GOOD_NUMBER", 7u64), 42);
    }
}
