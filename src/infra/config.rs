use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use env_helpers::get_env_default;
use url::Url;

use crate::app_error::{AppError, AppResult};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const TOKEN_STORE_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Resolved once at startup; every endpoint is built from it.
    pub backend_base_url: Url,
    /// Per-user data directory unless overridden, so every working
    /// directory sees the same session.
    pub token_store_path: PathBuf,
    pub request_timeout_secs: u64,
    /// Uploads wait on OCR, so they get their own budget.
    pub upload_timeout_secs: u64,
    /// JSON log file, in addition to the console.
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let backend_url: String =
            get_env_default("IDCHECK_BACKEND_URL", DEFAULT_BACKEND_URL.to_string());
        let token_store = std::env::var("IDCHECK_TOKEN_STORE")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let request_timeout: String =
            get_env_default("IDCHECK_REQUEST_TIMEOUT_SECS", "30".to_string());
        let upload_timeout: String =
            get_env_default("IDCHECK_UPLOAD_TIMEOUT_SECS", "120".to_string());
        let log_file = std::env::var("IDCHECK_LOG_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self::from_values(
            &backend_url,
            token_store,
            &request_timeout,
            &upload_timeout,
            log_file,
        )
    }

    fn from_values(
        backend_url: &str,
        token_store: Option<String>,
        request_timeout: &str,
        upload_timeout: &str,
        log_file: Option<String>,
    ) -> AppResult<Self> {
        let backend_base_url = Url::parse(backend_url.trim()).map_err(|e| {
            AppError::Config(format!("IDCHECK_BACKEND_URL is not a valid URL: {}", e))
        })?;
        if !matches!(backend_base_url.scheme(), "http" | "https") {
            return Err(AppError::Config(
                "IDCHECK_BACKEND_URL must use http or https".to_string(),
            ));
        }

        let token_store_path = match token_store {
            Some(path) => PathBuf::from(path),
            None => default_token_store_path()?,
        };

        Ok(Self {
            backend_base_url,
            token_store_path,
            request_timeout_secs: parse_secs("IDCHECK_REQUEST_TIMEOUT_SECS", request_timeout)?,
            upload_timeout_secs: parse_secs("IDCHECK_UPLOAD_TIMEOUT_SECS", upload_timeout)?,
            log_file: log_file.map(PathBuf::from),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

}

/// `session.json` in the per-user data directory, e.g. `~/.local/share/idcheck/` on Linux.
pub fn default_token_store_path() -> AppResult<PathBuf> {
    let dirs = ProjectDirs::from("", "idcheck", "idcheck").ok_or_else(|| {
        AppError::Config(
            "Unable to determine a data directory; set IDCHECK_TOKEN_STORE".to_string(),
        )
    })?;
    Ok(dirs.data_dir().join(TOKEN_STORE_FILE))
}

fn parse_secs(key: &str, raw: &str) -> AppResult<u64> {
    match u64::from_str(raw.trim()) {
        Ok(0) => Err(AppError::Config(format!("{} must be greater than zero", key))),
        Ok(secs) => Ok(secs),
        Err(_) => Err(AppError::Config(format!("{} must be a whole number of seconds", key))),
    }
}
