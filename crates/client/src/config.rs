use std::path::PathBuf;
use std::time::Duration;

use snapbooth_core::develop::DEVELOP_TICK;

/// Booth configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the SnapBooth API server.
    pub api_url: String,
    /// Directory holding the persisted wall.
    pub data_dir: PathBuf,
    /// Interval between develop ramp steps.
    pub develop_tick: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".into(),
            data_dir: PathBuf::from("./.snapbooth"),
            develop_tick: DEVELOP_TICK,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables (and `.env`).
    ///
    /// | Env Var              | Default                 |
    /// |----------------------|-------------------------|
    /// | `SNAPBOOTH_API_URL`  | `http://localhost:3000` |
    /// | `SNAPBOOTH_DATA_DIR` | `./.snapbooth`          |
    /// | `DEVELOP_TICK_MS`    | `50`                    |
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let api_url = std::env::var("SNAPBOOTH_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let data_dir = std::env::var("SNAPBOOTH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let develop_tick = match std::env::var("DEVELOP_TICK_MS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!(value = %raw, "DEVELOP_TICK_MS is not a positive integer, using default");
                    defaults.develop_tick
                }
            },
            Err(_) => defaults.develop_tick,
        };

        Self {
            api_url,
            data_dir,
            develop_tick,
        }
    }
}
