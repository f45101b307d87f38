use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent means the document store is never initialized; the server
    /// still starts and serves an empty calendar.
    pub database_url: Option<String>,
    pub port: u16,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_uri: Option<String>,
    /// Where the OAuth callback redirects the browser with the outcome
    pub settings_page_url: String,
    pub roster_path: Option<String>,
    pub prefs_path: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
            google_redirect_uri: env::var("GOOGLE_REDIRECT_URI").ok(),
            settings_page_url: env::var("SETTINGS_PAGE_URL")
                .unwrap_or_else(|_| "/settings".to_string()),
            roster_path: env::var("ROSTER_PATH").ok(),
            prefs_path: env::var("PREFS_PATH")
                .unwrap_or_else(|_| "famboard-prefs.json".to_string()),
        })
    }
}
