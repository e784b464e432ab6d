use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ACCEPTED_STATUS, PROBLEM_URL_PREFIX};

/// One public submission as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(rename = "titleSlug")]
    pub problem_id: String,
    pub title: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "statusDisplay")]
    pub status: String,
    pub lang: String,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.status == ACCEPTED_STATUS
    }

    pub fn problem_url(&self) -> String {
        problem_url(&self.problem_id)
    }
}

pub fn problem_url(slug: &str) -> String {
    format!("{PROBLEM_URL_PREFIX}{slug}/")
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicTag {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMetadata {
    pub slug: String,
    pub title: String,
    pub frontend_id: Option<String>,
    /// Raw label from the provider (`"Easy"`, `"Medium"`, `"Hard"`).
    pub difficulty: Option<String>,
    pub topic_tags: Vec<TopicTag>,
}

/// Buckets used by the per-topic difficulty breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive; unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: u64,
    pub submissions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub display_name: String,
    pub icon: Option<String>,
    pub creation_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributions {
    pub points: u64,
    pub question_count: u64,
    pub testcase_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub real_name: Option<String>,
    pub avatar: Option<String>,
    pub ranking: Option<u64>,
    pub reputation: Option<i64>,
    pub about_me: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub skill_tags: Vec<String>,
    pub ac_submission_num: Vec<DifficultyCount>,
    pub total_submission_num: Vec<DifficultyCount>,
    pub badges: Vec<Badge>,
    pub contributions: Option<Contributions>,
}

impl UserProfile {
    /// Accepted problem count for a difficulty row (`"All"`, `"Easy"`, ...).
    pub fn solved(&self, difficulty: &str) -> u64 {
        find_count(&self.ac_submission_num, difficulty)
    }

    /// Lifetime submission count for a difficulty row.
    pub fn submissions(&self, difficulty: &str) -> u64 {
        find_count(&self.total_submission_num, difficulty)
    }
}

fn find_count(rows: &[DifficultyCount], difficulty: &str) -> u64 {
    rows.iter()
        .find(|row| row.difficulty == difficulty)
        .map(|row| row.count)
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestRanking {
    pub attended_contests_count: u32,
    pub rating: Option<f64>,
    pub global_ranking: Option<u64>,
    pub top_percentage: Option<f64>,
}

/// Session cookies lifted from a signed-in browser.
#[derive(Clone)]
pub struct SessionCredential {
    pub session: String,
    pub csrf_token: Option<String>,
}

impl SessionCredential {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            csrf_token: None,
        }
    }

    pub fn cookie_header(&self) -> String {
        match &self.csrf_token {
            Some(csrf) => format!("LEETCODE_SESSION={}; csrftoken={}", self.session, csrf),
            None => format!("LEETCODE_SESSION={}", self.session),
        }
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("session", &"***REDACTED***")
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "***REDACTED***"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub signed_in: bool,
    pub username: Option<String>,
}

impl SessionUser {
    pub fn matches(&self, username: &str) -> bool {
        self.signed_in
            && self
                .username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(username))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedSubmission {
    pub id: u64,
    pub title: String,
    pub title_slug: String,
    pub timestamp: i64,
    pub status_display: String,
    pub lang: String,
    pub runtime: Option<String>,
    pub memory: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPage {
    pub has_next: bool,
    pub submissions: Vec<AuthenticatedSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetail {
    pub id: u64,
    pub title: Option<String>,
    pub title_slug: Option<String>,
    pub code: String,
    pub lang: Option<String>,
    pub runtime: Option<String>,
    pub memory: Option<String>,
    pub status_code: Option<i64>,
    pub timestamp: Option<i64>,
}
