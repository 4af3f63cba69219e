use snapbooth_core::gallery::GALLERY_CAPACITY;
use snapbooth_gemini::api::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Without
/// `DATABASE_URL` the gallery lives in memory; without `API_KEY` the
/// caption endpoint answers with a configuration error.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Maximum number of entries kept in the public gallery (default: `50`).
    pub gallery_capacity: usize,
    /// Gemini credential.
    pub api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
    /// Gemini REST base URL.
    pub gemini_api_url: String,
    /// PostgreSQL URL for the gallery list.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                      |
    /// |------------------------|----------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                    |
    /// | `PORT`                 | `3000`                                       |
    /// | `CORS_ORIGINS`         | `*`                                          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                         |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                                         |
    /// | `GALLERY_CAPACITY`     | `50` (may lower, never raise)                |
    /// | `API_KEY`              | unset                                        |
    /// | `GEMINI_MODEL`         | `gemini-2.5-flash`                           |
    /// | `GEMINI_API_URL`       | `https://generativelanguage.googleapis.com`  |
    /// | `DATABASE_URL`         | unset (in-memory gallery)                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let gallery_capacity = capped_capacity(
            std::env::var("GALLERY_CAPACITY")
                .map(|v| v.parse().expect("GALLERY_CAPACITY must be a valid usize"))
                .ok(),
        );

        let api_key = non_empty_var("API_KEY");
        let gemini_model = non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let gemini_api_url =
            non_empty_var("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let database_url = non_empty_var("DATABASE_URL");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            gallery_capacity,
            api_key,
            gemini_model,
            gemini_api_url,
            database_url,
        }
    }

    /// Number of gallery entries to keep and list. Never above
    /// [`GALLERY_CAPACITY`].
    pub fn gallery_limit(&self) -> usize {
        self.gallery_capacity.min(GALLERY_CAPACITY)
    }

    /// Whether CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

/// `GALLERY_CAPACITY` may lower the gallery cap but never raise it.
fn capped_capacity(requested: Option<usize>) -> usize {
    requested.map_or(GALLERY_CAPACITY, |n| n.min(GALLERY_CAPACITY))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
