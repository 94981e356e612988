/// Runtime settings for a places client and its front ends.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub language: String,
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub icon_cache_capacity: usize,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[redacted]")
            .field("language", &self.language)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("icon_cache_capacity", &self.icon_cache_capacity)
            .field("log_level", &self.log_level)
            .finish()
    }
}
