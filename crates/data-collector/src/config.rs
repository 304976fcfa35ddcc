use std::env;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "SmartMoneyResearch/1.0 (contact: research@example.com)";

/// Immutable configuration handed to the provider adapters at
/// construction. SEC endpoints reject requests without a descriptive
/// user-agent, hence the env override.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub user_agent: String,
    pub request_timeout: Duration,
    pub history_range: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(20),
            history_range: "2y".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Default configuration with the `SEC_USER_AGENT` env override applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(agent) = env::var("SEC_USER_AGENT") {
            if !agent.is_empty() {
                config.user_agent = agent;
            }
        }
        config
    }
}
