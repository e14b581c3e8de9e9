//! Server configuration.

use std::time::Duration;

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Absolute origin prepended to `/files/..` links; relative links when unset.
    pub public_base_url: Option<String>,
    /// Allowed CORS origins; `*` allows any.
    pub cors_origins: Vec<String>,
    /// Max request body size in bytes.
    pub max_body_size: usize,
    /// How long a finished reel stays under `/files` before the sweeper deletes it.
    pub asset_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            public_base_url: None,
            cors_origins: vec!["*".to_string()],
            max_body_size: 1024 * 1024,
            asset_ttl: Duration::from_secs(3600),
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.port),
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            cors_origins: get("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.cors_origins),
            max_body_size: get("MAX_BODY_SIZE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_body_size),
            asset_ttl: get("ASSET_TTL_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.asset_ttl),
        }
    }

    /// Public link for a served file name.
    pub fn file_url(&self, file_name: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{base}/files/{file_name}"),
            None => format!("/files/{file_name}"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
