/// Recent submissions requested in standard mode
pub const DEFAULT_STANDARD_SUBMISSION_LIMIT: usize = 50;

/// Recent submissions requested in enhanced mode
pub const DEFAULT_ENHANCED_SUBMISSION_LIMIT: usize = 100;

/// Upper bound on problem metadata lookups per request
pub const DEFAULT_MAX_PROBLEM_LOOKUPS: usize = 30;

/// Pause between two consecutive metadata lookups (milliseconds)
pub const DEFAULT_LOOKUP_DELAY_MS: u64 = 200;

/// A topic needs this many attempts before it can be called the strongest
pub const DEFAULT_STRONGEST_MIN_ATTEMPTS: u32 = 3;

/// Minimum attempts before a topic can be flagged for improvement
pub const DEFAULT_IMPROVEMENT_MIN_ATTEMPTS: u32 = 2;

/// Topics below this success rate (percent) are improvement candidates
pub const DEFAULT_IMPROVEMENT_RATE_THRESHOLD: u32 = 60;

/// Maximum number of improvement areas reported
pub const DEFAULT_IMPROVEMENT_AREA_CAP: usize = 5;

/// Maximum number of topics returned for display
pub const DEFAULT_DISPLAY_TOPIC_CAP: usize = 20;

/// Timeout applied to every call against the LeetCode provider (seconds)
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 15;

/// Window used by the profile, dashboard and problem timeline views
pub const RECENT_WINDOW: usize = 20;

/// Submissions shown in the dashboard's recent activity block
pub const DASHBOARD_RECENT_ITEMS: usize = 10;

/// Page size when walking the authenticated submission list
pub const AUTH_SUBMISSION_PAGE_SIZE: usize = 20;

/// Hard cap on authenticated submissions collected per request
pub const AUTH_SUBMISSION_CAP: usize = 1000;

/// Status label the provider uses for a successful submission
pub const ACCEPTED_STATUS: &str = "Accepted";

pub const PROBLEM_URL_PREFIX: &str = "https://leetcode.com/problems/";

pub const DEFAULT_GRAPHQL_URL: &str = "https://leetcode.com/graphql";

pub const DEFAULT_LEETCODE_BASE_URL: &str = "https://leetcode.com";
