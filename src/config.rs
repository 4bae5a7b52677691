use std::env;
use std::time::Duration;

use crate::services::kodi::{ConnectionConfig, RpcTimeouts};

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub container_host: String,
    pub refresh_interval_secs: u64,

    // Kodi
    pub kodi_host: String,
    pub kodi_port: Option<u16>,
    pub kodi_username: String,
    pub kodi_password: String,

    // Timeouts
    pub rpc_timeout_secs: u64,
    pub statistics_timeout_secs: u64,
    pub enumeration_timeout_secs: u64,
    pub download_timeout_secs: u64,

    // Files
    pub artwork_dir: String,
    pub static_dir: String,
    pub html_file: String,
    pub json_file: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "5005".to_string())
                .parse()
                .unwrap_or(5005),
            container_host: env::var("CONTAINER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86_400), // 24 hours

            // Kodi
            kodi_host: env::var("KODI_HOST")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            kodi_port: env::var("KODI_PORT").ok().and_then(|v| v.parse().ok()),
            kodi_username: env::var("KODI_USERNAME").unwrap_or_default(),
            kodi_password: env::var("KODI_PASSWORD").unwrap_or_default(),

            // Timeouts
            rpc_timeout_secs: env::var("RPC_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            statistics_timeout_secs: env::var("STATISTICS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            enumeration_timeout_secs: env::var("ENUMERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap_or(120),
            download_timeout_secs: env::var("DOWNLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Files
            artwork_dir: env::var("ARTWORK_DIR")
                .unwrap_or_else(|_| "output/artwork".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            html_file: env::var("HTML_FILE").unwrap_or_else(|_| "kodi_stats.html".to_string()),
            json_file: env::var("JSON_FILE")
                .unwrap_or_else(|_| "kodi_library_stats.json".to_string()),
        }
    }

    /// Kodi endpoint described by the host/port/credential settings
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig::from_host(
            &self.kodi_host,
            self.kodi_port,
            &self.kodi_username,
            &self.kodi_password,
        )
    }

    pub fn timeouts(&self) -> RpcTimeouts {
        RpcTimeouts {
            request: Duration::from_secs(self.rpc_timeout_secs),
            statistics: Duration::from_secs(self.statistics_timeout_secs),
            enumeration: Duration::from_secs(self.enumeration_timeout_secs),
            download: Duration::from_secs(self.download_timeout_secs),
            ..RpcTimeouts::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

// Keeps the password out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("container_host", &self.container_host)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("kodi_host", &self.kodi_host)
            .field("kodi_port", &self.kodi_port)
            .field("kodi_username", &self.kodi_username)
            .field("artwork_dir", &self.artwork_dir)
            .field("static_dir", &self.static_dir)
            .finish_non_exhaustive()
    }
}
