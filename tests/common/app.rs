use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;

use leetcode_insights::config::{
    AnalyticsConfig, Config, LLMConfig, ProviderConfig, RateLimitConfig,
};
use leetcode_insights::routes::build_router;
use leetcode_insights::state::AppState;

use super::fixtures::{CountingThrottle, ScriptedProvider};

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    pub provider: Arc<ScriptedProvider>,
    pub throttle: Arc<CountingThrottle>,
}

/// Built directly rather than from the environment so parallel tests do not
/// race on `set_var`.
pub fn test_config() -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        log_level: "info".to_string(),
        json_logs: false,
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "http://localhost:3001".to_string(),
        trust_proxy: false,
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: 100,
        },
        provider: ProviderConfig::default(),
        analytics: AnalyticsConfig::default(),
        llm: LLMConfig {
            enabled: true,
            mock: true,
            ..LLMConfig::default()
        },
    }
}

pub fn spawn_with(provider: ScriptedProvider, config: Config) -> TestApp {
    let provider = Arc::new(provider);
    let throttle = Arc::new(CountingThrottle::default());
    let state = AppState::with_provider(&config, provider.clone(), throttle.clone());

    TestApp {
        app: build_router(state.clone()),
        state,
        config,
        provider,
        throttle,
    }
}

pub fn spawn_test_app(provider: ScriptedProvider) -> TestApp {
    spawn_with(provider, test_config())
}

pub fn spawn_test_server_with_limits(provider: ScriptedProvider, api_limit: u64) -> TestApp {
    let mut config = test_config();
    config.rate_limit.max_requests = api_limit;
    spawn_with(provider, config)
}
