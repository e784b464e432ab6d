use crate::config::AnalyticsConfig;

use super::aggregate::TopicRecord;

/// Thresholds used to pick the strongest topic and improvement areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingPolicy {
    pub strongest_min_attempts: u32,
    pub improvement_min_attempts: u32,
    pub improvement_rate_threshold: u32,
    pub improvement_area_cap: usize,
}

impl From<&AnalyticsConfig> for RankingPolicy {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            strongest_min_attempts: config.strongest_min_attempts,
            improvement_min_attempts: config.improvement_min_attempts,
            improvement_rate_threshold: config.improvement_rate_threshold,
            improvement_area_cap: config.improvement_area_cap,
        }
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    /// Every topic, ranked.
    pub ranked: Vec<TopicRecord>,
    pub average_success_rate: u32,
    pub strongest: Option<TopicRecord>,
    pub improvement_areas: Vec<TopicRecord>,
}

/// Most attempts first, then higher success rate. Stable for full ties.
pub fn rank(mut records: Vec<TopicRecord>) -> Vec<TopicRecord> {
    records.sort_by(|a, b| {
        b.total_attempts
            .cmp(&a.total_attempts)
            .then(b.success_rate.cmp(&a.success_rate))
    });
    records
}

/// First ranked topic with enough attempts, else the top-ranked one.
pub fn strongest_topic(ranked: &[TopicRecord], min_attempts: u32) -> Option<&TopicRecord> {
    ranked
        .iter()
        .find(|t| t.total_attempts >= min_attempts)
        .or_else(|| ranked.first())
}

/// Ranked topics with enough attempts and a success rate under the threshold.
pub fn improvement_areas<'a>(
    ranked: &'a [TopicRecord],
    policy: &RankingPolicy,
) -> Vec<&'a TopicRecord> {
    ranked
        .iter()
        .filter(|t| {
            t.total_attempts >= policy.improvement_min_attempts
                && t.success_rate < policy.improvement_rate_threshold
        })
        .take(policy.improvement_area_cap)
        .collect()
}

pub fn summarize(records: Vec<TopicRecord>, policy: &RankingPolicy) -> TopicSummary {
    let ranked = rank(records);
    let rates: Vec<u32> = ranked.iter().map(|t| t.success_rate).collect();

    TopicSummary {
        average_success_rate: super::rounded_mean(&rates),
        strongest: strongest_topic(&ranked, policy.strongest_min_attempts).cloned(),
        improvement_areas: improvement_areas(&ranked, policy)
            .into_iter()
            .cloned()
            .collect(),
        ranked,
    }
}
