//! Topic analytics: turns a user's recent submissions into per-topic
//! success statistics.
//!
//! Data flows `gather` → `resolve` → `aggregate` → `summary`, and
//! [`report::TopicAnalyzer`] runs the whole chain for one request. Nothing is
//! cached between requests.

pub mod activity;
pub mod aggregate;
pub mod gather;
pub mod report;
pub mod resolve;
pub mod summary;

pub use activity::{
    acceptance_rate, problem_timeline, submission_analytics, ProblemStats, ProblemTimeline,
    SubmissionAnalytics, SubmissionView,
};
pub use aggregate::{aggregate, DifficultyBreakdown, DifficultyTally, TopicRecord, TopicTable};
pub use gather::{gather, FetchMode, GatheredSubmissions};
pub use report::{TopicAnalyzer, TopicsAnalysis, TopicsReport};
pub use resolve::{unique_problem_ids, MetadataResolver, Resolution, SleepThrottle, Throttle};
pub use summary::{improvement_areas, rank, strongest_topic, summarize, RankingPolicy, TopicSummary};

/// `round(100 * part / whole)` with halves rounded up; `0` for an empty whole.
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Integer mean rounded half up; `0` for an empty slice.
pub fn rounded_mean(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    let n = values.len() as u64;
    ((sum * 2 + n) / (n * 2)) as u32
}
