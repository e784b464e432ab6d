use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analytics::{SleepThrottle, Throttle, TopicAnalyzer};
use crate::config::Config;
use crate::leetcode::{LeetCodeClient, LeetCodeProvider};
use crate::middleware::rate_limit::RateLimitState;
use crate::services::llm_provider::LlmProvider;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    provider: Arc<dyn LeetCodeProvider>,
    analyzer: TopicAnalyzer,
    llm: Arc<LlmProvider>,
    rate_limit: Arc<RateLimitState>,
    started_at: Instant,
}

impl AppState {
    /// State backed by the live LeetCode GraphQL client.
    pub fn new(config: &Config) -> Self {
        let provider: Arc<dyn LeetCodeProvider> = Arc::new(LeetCodeClient::new(&config.provider));
        Self::with_provider(config, provider, Arc::new(SleepThrottle))
    }

    pub fn with_provider(
        config: &Config,
        provider: Arc<dyn LeetCodeProvider>,
        throttle: Arc<dyn Throttle>,
    ) -> Self {
        let analyzer = TopicAnalyzer::new(
            provider.clone(),
            throttle,
            config.analytics.clone(),
            config.provider.call_timeout(),
        );

        Self {
            config: Arc::new(config.clone()),
            provider,
            analyzer,
            llm: Arc::new(LlmProvider::new(&config.llm)),
            rate_limit: Arc::new(RateLimitState::new(
                config.rate_limit.window_secs,
                config.rate_limit.max_requests,
            )),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &dyn LeetCodeProvider {
        self.provider.as_ref()
    }

    pub fn analyzer(&self) -> &TopicAnalyzer {
        &self.analyzer
    }

    pub fn llm(&self) -> &LlmProvider {
        &self.llm
    }

    pub fn rate_limit(&self) -> &Arc<RateLimitState> {
        &self.rate_limit
    }

    /// Per-call time limit for provider requests made directly by handlers.
    pub fn call_timeout(&self) -> Duration {
        self.config.provider.call_timeout()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
