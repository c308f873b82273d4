use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use trackfolio_core::quotes::ProviderConfig;
use trackfolio_core::refresh::RefreshConfig;

const DEFAULT_DB_PATH: &str = "./db/app.db";
const DEMO_FINNHUB_KEY: &str = "demo";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub request_timeout: Duration,
    pub providers: ProviderConfig,
    pub refresh: RefreshConfig,
}

/// Read `key`, falling back to `default` when unset or unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using the default", raw, key);
            default
        }),
        Err(_) => default,
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Reads the process environment; `main` loads `.env` beforehand.
    pub fn from_env() -> Self {
        let default_addr = SocketAddr::from(([0, 0, 0, 0], 5000));
        let listen_addr = env_or("TF_LISTEN_ADDR", default_addr);
        let db_path = non_empty_env("TF_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let timeout_ms: u64 = env_or("TF_REQUEST_TIMEOUT_MS", 30_000);

        let finnhub_api_key = non_empty_env("FINNHUB_API_KEY").unwrap_or_else(|| {
            tracing::warn!("FINNHUB_API_KEY is not set, using the rate-limited demo key");
            DEMO_FINNHUB_KEY.to_string()
        });

        let defaults = RefreshConfig::default();
        let interval_secs: u64 = env_or("TF_REFRESH_INTERVAL_SECS", defaults.interval.as_secs());
        let pacing_ms: u64 = env_or(
            "TF_REFRESH_PACING_MS",
            defaults.pacing_delay.as_millis() as u64,
        );
        let interval = if interval_secs == 0 {
            tracing::warn!("TF_REFRESH_INTERVAL_SECS must be positive, using the default");
            defaults.interval
        } else {
            Duration::from_secs(interval_secs)
        };

        Self {
            listen_addr,
            db_path,
            request_timeout: Duration::from_millis(timeout_ms),
            providers: ProviderConfig {
                finnhub_api_key,
                finnhub_base_url: non_empty_env("FINNHUB_BASE_URL"),
                metal_price_api_key: non_empty_env("METAL_API_KEY"),
                metal_price_api_base_url: non_empty_env("METAL_PRICE_API_BASE_URL"),
            },
            refresh: RefreshConfig {
                interval,
                pacing_delay: Duration::from_millis(pacing_ms),
            },
        }
    }
}
