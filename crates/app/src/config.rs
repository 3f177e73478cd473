use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables (a `.env` file is honoured by the
/// binary entry point).
#[derive(Debug, Clone)]
pub struct Config {
    /// Persistence engine connection string (default: `sqlite://clientele.db`).
    pub database_url: String,
    /// Deployment environment label. Informational only; forwarded to the
    /// observability collaborator, never interpreted by the core.
    pub environment: String,
    /// Observability sink address (e.g. an error-tracking DSN). Optional and
    /// informational only.
    pub observability_dsn: Option<String>,
    /// Session record path override. When unset, the session store picks its
    /// per-user default.
    pub session_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                  |
    /// |---------------------|--------------------------|
    /// | `DATABASE_URL`      | `sqlite://clientele.db`  |
    /// | `ENVIRONMENT`       | `development`            |
    /// | `OBSERVABILITY_DSN` | unset                    |
    /// | `SESSION_FILE`      | unset (per-user default) |
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://clientele.db".into());

        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let observability_dsn = std::env::var("OBSERVABILITY_DSN").ok().filter(|s| !s.is_empty());

        let session_file = std::env::var_os("SESSION_FILE").map(PathBuf::from);

        Self { database_url, environment, observability_dsn, session_file }
    }
}
