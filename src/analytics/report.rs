use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::leetcode::{LeetCodeProvider, ProviderError};

use super::aggregate::{aggregate, DifficultyBreakdown, TopicRecord};
use super::gather::{gather, FetchMode, GatheredSubmissions};
use super::resolve::{unique_problem_ids, MetadataResolver, Resolution, Throttle};
use super::summary::{summarize, RankingPolicy};

pub const NO_SUBMISSIONS_MESSAGE: &str = "No submissions found for topic analysis";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAnalytics {
    pub topic_name: String,
    pub slug: String,
    pub total_attempts: u32,
    pub successful_attempts: u32,
    pub failed_attempts: u32,
    pub success_rate: u32,
    pub problems: Vec<String>,
    /// UTC date of the latest contributing submission.
    pub recent_activity: String,
    pub difficulty: DifficultyBreakdown,
}

impl From<&TopicRecord> for TopicAnalytics {
    fn from(record: &TopicRecord) -> Self {
        Self {
            topic_name: record.name.clone(),
            slug: record.slug.clone(),
            total_attempts: record.total_attempts,
            successful_attempts: record.successful_attempts,
            failed_attempts: record.failed_attempts,
            success_rate: record.success_rate,
            problems: record.problems.clone(),
            recent_activity: activity_date(record.most_recent_timestamp),
            difficulty: record.difficulty,
        }
    }
}

fn activity_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "No recent activity".to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_topics_analyzed: usize,
    pub total_problems_analyzed: usize,
    pub total_submissions_analyzed: usize,
    pub average_success_rate: u32,
    pub strongest_topic: Option<TopicAnalytics>,
    pub improvement_areas: Vec<TopicAnalytics>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub enhanced: bool,
    pub total_submissions_analyzed: usize,
    pub analysis_limit_reached: bool,
    pub total_unique_problems: usize,
    pub problems_analyzed: usize,
    pub problems_skipped: usize,
    pub problems_failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_total_submissions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_percent: Option<u32>,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicsAnalysis {
    pub username: String,
    pub topic_analytics: Vec<TopicAnalytics>,
    pub overall_stats: OverallStats,
    pub metadata: AnalysisMetadata,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyTopics {
    pub username: String,
    pub message: String,
    pub topic_analytics: Vec<TopicAnalytics>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TopicsReport {
    Analysis(Box<TopicsAnalysis>),
    Empty(EmptyTopics),
}

/// Runs the whole topic pipeline for one request.
#[derive(Clone)]
pub struct TopicAnalyzer {
    provider: Arc<dyn LeetCodeProvider>,
    throttle: Arc<dyn Throttle>,
    config: AnalyticsConfig,
    call_timeout: Duration,
}

impl TopicAnalyzer {
    pub fn new(
        provider: Arc<dyn LeetCodeProvider>,
        throttle: Arc<dyn Throttle>,
        config: AnalyticsConfig,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            throttle,
            config,
            call_timeout,
        }
    }

    pub async fn analyze(
        &self,
        username: &str,
        mode: FetchMode,
    ) -> Result<TopicsReport, ProviderError> {
        let gathered = gather(
            self.provider.as_ref(),
            username,
            mode,
            &self.config,
            self.call_timeout,
        )
        .await?;

        if gathered.submissions.is_empty() {
            return Ok(TopicsReport::Empty(EmptyTopics {
                username: username.to_string(),
                message: NO_SUBMISSIONS_MESSAGE.to_string(),
                topic_analytics: Vec::new(),
                fetched_at: Utc::now(),
            }));
        }

        let ids = unique_problem_ids(&gathered.submissions);
        let resolution = MetadataResolver::new(
            self.provider.as_ref(),
            self.throttle.as_ref(),
            self.config.max_problem_lookups,
            self.config.lookup_delay(),
            self.call_timeout,
        )
        .resolve(&ids)
        .await;

        let table = aggregate(&gathered.submissions, &resolution.metadata);
        let summary = summarize(table.into_records(), &RankingPolicy::from(&self.config));

        let overall_stats = OverallStats {
            total_topics_analyzed: summary.ranked.len(),
            total_problems_analyzed: resolution.resolved(),
            total_submissions_analyzed: gathered.submissions.len(),
            average_success_rate: summary.average_success_rate,
            strongest_topic: summary.strongest.as_ref().map(TopicAnalytics::from),
            improvement_areas: summary
                .improvement_areas
                .iter()
                .map(TopicAnalytics::from)
                .collect(),
        };

        let metadata = AnalysisMetadata {
            enhanced: mode.is_enhanced(),
            total_submissions_analyzed: gathered.submissions.len(),
            analysis_limit_reached: resolution.limit_reached(),
            total_unique_problems: resolution.total_unique,
            problems_analyzed: resolution.resolved(),
            problems_skipped: resolution.skipped.len(),
            problems_failed: resolution.failed.len(),
            profile_total_submissions: gathered.profile_total,
            coverage_percent: gathered.coverage_percent(),
            note: analysis_note(&gathered, &resolution, self.config.max_problem_lookups),
        };

        Ok(TopicsReport::Analysis(Box::new(TopicsAnalysis {
            username: username.to_string(),
            topic_analytics: summary
                .ranked
                .iter()
                .take(self.config.display_topic_cap)
                .map(TopicAnalytics::from)
                .collect(),
            overall_stats,
            metadata,
            fetched_at: Utc::now(),
        })))
    }
}

fn analysis_note(gathered: &GatheredSubmissions, resolution: &Resolution, cap: usize) -> String {
    let count = gathered.submissions.len();
    let mut note = if gathered.mode.is_enhanced() {
        match (gathered.profile_total, gathered.coverage_percent()) {
            (Some(total), Some(coverage)) => format!(
                "Enhanced analysis: processed {count} submissions ({coverage}% of {total} lifetime submissions)"
            ),
            _ => format!("Enhanced analysis: processed {count} submissions"),
        }
    } else {
        format!("Standard analysis: processed {count} recent submissions")
    };

    if resolution.limit_reached() {
        note.push_str(&format!(
            ", limited to {cap} unique problems to avoid rate limiting"
        ));
    }
    note.push('.');

    if !resolution.failed.is_empty() {
        note.push_str(&format!(
            " {} problem lookup(s) failed and were left out of topic statistics.",
            resolution.failed.len()
        ));
    }

    if gathered.mode.is_enhanced() {
        note.push_str(" LeetCode only exposes recent submissions.");
    } else {
        note.push_str(" Use enhanced mode for a larger submission window and context.");
    }
    note
}
