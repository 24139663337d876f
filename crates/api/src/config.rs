use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// recognition provider credential, which must be set. Constructed once at
/// startup and passed into state and adapters; nothing reads the
/// environment after boot.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Public base URL used to build stored-image links (default:
    /// `http://localhost:3000`).
    pub app_url: String,
    /// Directory uploaded meter images are written to (default: `./files`).
    pub files_dir: PathBuf,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Recognition provider settings.
    pub gemini: GeminiConfig,
}

/// Recognition provider (Gemini) settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API credential. Required.
    pub api_key: String,
    /// Base URL, overridable so tests can point at a stub server.
    pub api_url: String,
    /// Model name (default: `gemini-1.5-pro`).
    pub model: String,
    /// Timeout for the recognition call in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                       |
    /// |-------------------------|-----------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                     |
    /// | `PORT`                  | `3000`                                        |
    /// | `APP_URL`               | `http://localhost:3000`                       |
    /// | `FILES_DIR`             | `./files`                                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`                       |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                          |
    /// | `GEMINI_API_KEY`        | *(required)*                                  |
    /// | `GEMINI_API_URL`        | `https://generativelanguage.googleapis.com`   |
    /// | `GEMINI_MODEL`          | `gemini-1.5-pro`                              |
    /// | `PROVIDER_TIMEOUT_SECS` | `30`                                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let app_url =
            std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let files_dir =
            PathBuf::from(std::env::var("FILES_DIR").unwrap_or_else(|_| "./files".into()));

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set"),
            api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-pro".into()),
            timeout_secs: std::env::var("PROVIDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("PROVIDER_TIMEOUT_SECS must be a valid u64"),
        };

        Self {
            host,
            port,
            app_url,
            files_dir,
            cors_origins,
            request_timeout_secs,
            gemini,
        }
    }
}
