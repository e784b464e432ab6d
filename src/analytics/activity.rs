//! Submission views and light analytics for the dashboard endpoints.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::leetcode::{Submission, UserProfile};

/// A recent submission enriched for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub title: String,
    pub title_slug: String,
    pub timestamp: i64,
    pub status_display: String,
    pub lang: String,
    pub submitted_at: String,
    pub is_accepted: bool,
    pub problem_url: String,
}

impl From<&Submission> for SubmissionView {
    fn from(s: &Submission) -> Self {
        Self {
            title: s.title.clone(),
            title_slug: s.problem_id.clone(),
            timestamp: s.timestamp,
            status_display: s.status.clone(),
            lang: s.lang.clone(),
            submitted_at: rfc3339(s.timestamp),
            is_accepted: s.is_accepted(),
            problem_url: s.problem_url(),
        }
    }
}

fn rfc3339(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

fn distinct_languages<'a>(subs: impl IntoIterator<Item = &'a Submission>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut languages = Vec::new();
    for s in subs {
        if seen.insert(s.lang.as_str()) {
            languages.push(s.lang.clone());
        }
    }
    languages
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAnalytics {
    pub total_submissions: usize,
    pub accepted_submissions: usize,
    pub languages: Vec<String>,
    pub recent_acceptance_rate: u32,
    /// Distinct problems with at least one accepted submission.
    pub problems_solved: usize,
}

pub fn submission_analytics(subs: &[Submission]) -> SubmissionAnalytics {
    let accepted: Vec<&Submission> = subs.iter().filter(|s| s.is_accepted()).collect();
    let solved: HashSet<&str> = accepted.iter().map(|s| s.problem_id.as_str()).collect();

    SubmissionAnalytics {
        total_submissions: subs.len(),
        accepted_submissions: accepted.len(),
        languages: distinct_languages(subs),
        recent_acceptance_rate: super::percent(accepted.len() as u64, subs.len() as u64),
        problems_solved: solved.len(),
    }
}

/// Solved counts per difficulty from the public profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStats {
    pub total_solved: u64,
    pub easy_solved: u64,
    pub medium_solved: u64,
    pub hard_solved: u64,
}

impl From<&UserProfile> for ProblemStats {
    fn from(profile: &UserProfile) -> Self {
        Self {
            total_solved: profile.solved("All"),
            easy_solved: profile.solved("Easy"),
            medium_solved: profile.solved("Medium"),
            hard_solved: profile.solved("Hard"),
        }
    }
}

/// Lifetime accepted share, 0 when the profile has no submissions.
pub fn acceptance_rate(profile: &UserProfile) -> u32 {
    super::percent(profile.solved("All"), profile.submissions("All"))
}

pub fn time_ago(submitted: i64, now: DateTime<Utc>) -> String {
    let secs = (now.timestamp() - submitted).max(0);
    match secs {
        s if s < 60 => format!("{s}s ago"),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        s if s < 2_419_200 => format!("{}w ago", s / 604_800),
        s => format!("{}mo ago", s / 2_419_200),
    }
}

/// Span between the first and latest attempt, rounded to its largest unit.
pub fn time_spent(first: i64, latest: i64, attempts: usize) -> String {
    if attempts < 2 {
        return "N/A".to_string();
    }
    let secs = (latest - first).max(0);
    if secs < 3_600 {
        format!("{}m", (secs + 30) / 60)
    } else if secs < 86_400 {
        format!("{}h", (secs + 1_800) / 3_600)
    } else {
        format!("{}d", (secs + 43_200) / 86_400)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: String,
    #[serde(flatten)]
    pub submission: SubmissionView,
    pub time_ago: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineAnalytics {
    pub total_submissions: usize,
    pub successful_submissions: usize,
    pub failed_submissions: usize,
    pub languages: Vec<String>,
    pub first_attempt: TimelineEntry,
    pub latest_attempt: TimelineEntry,
    pub success_rate: u32,
    pub time_spent: String,
    pub attempts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProblemTimeline {
    pub title: String,
    pub entries: Vec<TimelineEntry>,
    pub analytics: TimelineAnalytics,
}

/// Attempts at `slug` within `recent`, newest first. `None` when the user has
/// no submission for that problem in the window.
pub fn problem_timeline(
    recent: &[Submission],
    slug: &str,
    now: DateTime<Utc>,
) -> Option<ProblemTimeline> {
    let mut attempts: Vec<&Submission> = recent.iter().filter(|s| s.problem_id == slug).collect();
    attempts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let entries: Vec<TimelineEntry> = attempts
        .iter()
        .map(|s| TimelineEntry {
            id: format!("{}-{}", s.timestamp, s.lang),
            submission: SubmissionView::from(*s),
            time_ago: time_ago(s.timestamp, now),
        })
        .collect();

    let latest = entries.first()?.clone();
    let first = entries.last()?.clone();
    let successful = attempts.iter().filter(|s| s.is_accepted()).count();
    let total = entries.len();

    let analytics = TimelineAnalytics {
        total_submissions: total,
        successful_submissions: successful,
        failed_submissions: total - successful,
        languages: distinct_languages(attempts.iter().copied()),
        success_rate: super::percent(successful as u64, total as u64),
        time_spent: time_spent(first.submission.timestamp, latest.submission.timestamp, total),
        attempts: total,
        first_attempt: first,
        latest_attempt: latest,
    };

    Some(ProblemTimeline {
        title: attempts[0].title.clone(),
        entries,
        analytics,
    })
}
