use std::env;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the session/order backend.
    pub backend_url: String,
    /// Executor contract address baked into every signed order message.
    pub executor_address: String,
    /// Request timeout for backend calls (ms).
    pub request_timeout_ms: u64,
    /// Fraction of the viewport width devoted to history left of the "now"
    /// column (0 < fraction <= 1).
    pub past_fraction: f64,
    /// Default number of bars visible at zoom factor 1.0.
    pub default_visible_bars: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            backend_url: env::var("GRIDTAP_BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3001".to_string()),
            executor_address: env::var("GRIDTAP_EXECUTOR_ADDRESS").unwrap_or_default(),
            request_timeout_ms: env::var("GRIDTAP_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            past_fraction: env::var("GRIDTAP_PAST_FRACTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.7),
            default_visible_bars: env::var("GRIDTAP_VISIBLE_BARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
