/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the student registry.
    pub student_service_url: String,
    /// Base URL of the institution/classroom registry.
    pub institution_service_url: String,
    /// Directory where justification documents are stored.
    pub upload_dir: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                   |
    /// |---------------------------|---------------------------|
    /// | `HOST`                    | `0.0.0.0`                 |
    /// | `PORT`                    | `8080`                    |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                      |
    /// | `STUDENT_SERVICE_URL`     | `http://localhost:9081`   |
    /// | `INSTITUTION_SERVICE_URL` | `http://localhost:9080`   |
    /// | `UPLOAD_DIR`              | `uploads/justifications`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

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

        let student_service_url = std::env::var("STUDENT_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:9081".into());

        let institution_service_url = std::env::var("INSTITUTION_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:9080".into());

        let upload_dir =
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads/justifications".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            student_service_url,
            institution_service_url,
            upload_dir,
        }
    }
}
