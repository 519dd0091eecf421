use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "AgroScan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OpenAI-compatible chat completions endpoint of the hosted AI gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 60;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Get the application data directory
/// ~/AgroScan/ on all platforms. Falls back to the working directory when
/// no home directory can be determined (containers, CI).
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the dashboard database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("agroscan.db")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "agroscan=info,tower_http=warn"
}

/// Runtime configuration, read once at start-up.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub gateway_url: String,
    /// `None` disables the vision analysis endpoint (it answers 500 "AI
    /// service not configured").
    pub gateway_api_key: Option<String>,
    pub gateway_model: String,
    pub gateway_timeout: Duration,
}

impl ServerConfig {
    /// Build the configuration from environment variables.
    ///
    /// - `AGROSCAN_BIND` — listen address (default `127.0.0.1:8787`)
    /// - `AGROSCAN_DB` — SQLite file (default `~/AgroScan/agroscan.db`)
    /// - `AI_GATEWAY_URL`, `AI_GATEWAY_API_KEY`, `AI_GATEWAY_MODEL`,
    ///   `AI_GATEWAY_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable lookup (tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("AGROSCAN_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid AGROSCAN_BIND '{bind_raw}': {e}"))?;

        let database_path = lookup("AGROSCAN_DB")
            .map(PathBuf::from)
            .unwrap_or_else(database_path);

        let gateway_timeout = match lookup("AI_GATEWAY_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| format!("Invalid AI_GATEWAY_TIMEOUT_SECS '{raw}': {e}"))?,
            None => DEFAULT_GATEWAY_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            database_path,
            gateway_url: lookup("AI_GATEWAY_URL").unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            gateway_api_key: lookup("AI_GATEWAY_API_KEY").filter(|k| !k.trim().is_empty()),
            gateway_model: lookup("AI_GATEWAY_MODEL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_MODEL.to_string()),
            gateway_timeout: Duration::from_secs(gateway_timeout),
        })
    }
}
