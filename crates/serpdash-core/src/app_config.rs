use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Registrable domain of the site being tracked, e.g. `"recharge.com"`.
    pub target_domain: String,
    /// Published CSV export URL; `None` serves the labeled sample dataset.
    pub sheet_csv_url: Option<String>,
    pub sheets_api_key: Option<String>,
    pub cache_ttl_secs: u64,
    pub fetch_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("target_domain", &self.target_domain)
            .field("sheet_csv_url", &self.sheet_csv_url)
            .field(
                "sheets_api_key",
                &self.sheets_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field(
                "fetch_retry_backoff_base_ms",
                &self.fetch_retry_backoff_base_ms,
            )
            .finish()
    }
}
