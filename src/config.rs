use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use std::fmt;

use crate::constants::{
    DEFAULT_DISPLAY_TOPIC_CAP, DEFAULT_ENHANCED_SUBMISSION_LIMIT, DEFAULT_GRAPHQL_URL,
    DEFAULT_IMPROVEMENT_AREA_CAP, DEFAULT_IMPROVEMENT_MIN_ATTEMPTS,
    DEFAULT_IMPROVEMENT_RATE_THRESHOLD, DEFAULT_LEETCODE_BASE_URL, DEFAULT_LOOKUP_DELAY_MS,
    DEFAULT_MAX_PROBLEM_LOOKUPS, DEFAULT_PROVIDER_TIMEOUT_SECS,
    DEFAULT_STANDARD_SUBMISSION_LIMIT, DEFAULT_STRONGEST_MIN_ATTEMPTS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub json_logs: bool,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub trust_proxy: bool,
    pub rate_limit: RateLimitConfig,
    pub provider: ProviderConfig,
    pub analytics: AnalyticsConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub graphql_url: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            base_url: DEFAULT_LEETCODE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

/// Policy knobs of the topic analytics pipeline.
///
/// Defaults live in [`crate::constants`]; each can be overridden through an
/// `ANALYTICS_*` environment variable.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub standard_submission_limit: usize,
    pub enhanced_submission_limit: usize,
    pub max_problem_lookups: usize,
    pub lookup_delay_ms: u64,
    pub strongest_min_attempts: u32,
    pub improvement_min_attempts: u32,
    pub improvement_rate_threshold: u32,
    pub improvement_area_cap: usize,
    pub display_topic_cap: usize,
}

impl AnalyticsConfig {
    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_delay_ms)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            standard_submission_limit: DEFAULT_STANDARD_SUBMISSION_LIMIT,
            enhanced_submission_limit: DEFAULT_ENHANCED_SUBMISSION_LIMIT,
            max_problem_lookups: DEFAULT_MAX_PROBLEM_LOOKUPS,
            lookup_delay_ms: DEFAULT_LOOKUP_DELAY_MS,
            strongest_min_attempts: DEFAULT_STRONGEST_MIN_ATTEMPTS,
            improvement_min_attempts: DEFAULT_IMPROVEMENT_MIN_ATTEMPTS,
            improvement_rate_threshold: DEFAULT_IMPROVEMENT_RATE_THRESHOLD,
            improvement_area_cap: DEFAULT_IMPROVEMENT_AREA_CAP,
            display_topic_cap: DEFAULT_DISPLAY_TOPIC_CAP,
        }
    }
}

#[derive(Clone)]
pub struct LLMConfig {
    pub enabled: bool,
    pub mock: bool,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mock: true,
            api_url: String::new(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLMConfig")
            .field("enabled", &self.enabled)
            .field("mock", &self.mock)
            .field("api_url", &self.api_url)
            .field("api_key", &"***REDACTED***")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        let llm_defaults = LLMConfig::default();
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            json_logs: env_or_bool("LOG_JSON", false),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3001"),
            trust_proxy: env_or_bool("TRUST_PROXY", false),
            rate_limit: RateLimitConfig {
                window_secs: env_or_parse("RATE_LIMIT_WINDOW_SECS", 900_u64),
                max_requests: env_or_parse("RATE_LIMIT_MAX", 300_u64),
            },
            provider: ProviderConfig {
                graphql_url: env_or("LEETCODE_GRAPHQL_URL", DEFAULT_GRAPHQL_URL),
                base_url: env_or("LEETCODE_BASE_URL", DEFAULT_LEETCODE_BASE_URL),
                timeout_secs: env_or_parse("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS),
            },
            analytics: AnalyticsConfig {
                standard_submission_limit: env_or_parse(
                    "ANALYTICS_STANDARD_LIMIT",
                    DEFAULT_STANDARD_SUBMISSION_LIMIT,
                ),
                enhanced_submission_limit: env_or_parse(
                    "ANALYTICS_ENHANCED_LIMIT",
                    DEFAULT_ENHANCED_SUBMISSION_LIMIT,
                ),
                max_problem_lookups: env_or_parse(
                    "ANALYTICS_MAX_PROBLEM_LOOKUPS",
                    DEFAULT_MAX_PROBLEM_LOOKUPS,
                ),
                lookup_delay_ms: env_or_parse("ANALYTICS_LOOKUP_DELAY_MS", DEFAULT_LOOKUP_DELAY_MS),
                strongest_min_attempts: env_or_parse(
                    "ANALYTICS_STRONGEST_MIN_ATTEMPTS",
                    DEFAULT_STRONGEST_MIN_ATTEMPTS,
                ),
                improvement_min_attempts: env_or_parse(
                    "ANALYTICS_IMPROVEMENT_MIN_ATTEMPTS",
                    DEFAULT_IMPROVEMENT_MIN_ATTEMPTS,
                ),
                improvement_rate_threshold: env_or_parse(
                    "ANALYTICS_IMPROVEMENT_RATE_THRESHOLD",
                    DEFAULT_IMPROVEMENT_RATE_THRESHOLD,
                ),
                improvement_area_cap: env_or_parse(
                    "ANALYTICS_IMPROVEMENT_AREA_CAP",
                    DEFAULT_IMPROVEMENT_AREA_CAP,
                ),
                display_topic_cap: env_or_parse(
                    "ANALYTICS_DISPLAY_TOPIC_CAP",
                    DEFAULT_DISPLAY_TOPIC_CAP,
                ),
            },
            llm: LLMConfig {
                enabled: env_or_bool("LLM_ENABLED", llm_defaults.enabled),
                mock: env_or_bool("LLM_MOCK", llm_defaults.mock),
                api_url: env_or("LLM_API_URL", "https://api.openai.com/v1"),
                api_key: env_or("LLM_API_KEY", ""),
                model: env_or("LLM_MODEL", &llm_defaults.model),
                max_tokens: env_or_parse("LLM_MAX_TOKENS", llm_defaults.max_tokens),
                temperature: env_or_parse("LLM_TEMPERATURE", llm_defaults.temperature),
                timeout_secs: env_or_parse("LLM_TIMEOUT_SECS", llm_defaults.timeout_secs),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
