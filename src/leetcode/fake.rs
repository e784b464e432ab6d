//! In-memory provider for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{
    ContestRanking, DifficultyCount, ProblemMetadata, SessionCredential, SessionUser,
    Submission, SubmissionDetail, SubmissionPage, TopicTag, UserProfile,
};
use super::{LeetCodeProvider, ProviderError};

#[derive(Default)]
pub struct FakeProvider {
    submissions: HashMap<String, Vec<Submission>>,
    profiles: HashMap<String, UserProfile>,
    problems: HashMap<String, ProblemMetadata>,
    failing_recent: HashSet<String>,
    problem_delay: Option<Duration>,
    problem_calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_submissions(mut self, username: &str, subs: Vec<Submission>) -> Self {
        self.submissions.insert(username.to_string(), subs);
        self
    }

    pub fn with_profile_total(mut self, username: &str, total: u64) -> Self {
        self.profiles.insert(
            username.to_string(),
            UserProfile {
                username: username.to_string(),
                total_submission_num: vec![DifficultyCount {
                    difficulty: "All".to_string(),
                    count: total,
                    submissions: total,
                }],
                ..UserProfile::default()
            },
        );
        self
    }

    pub fn with_problem(mut self, meta: ProblemMetadata) -> Self {
        self.problems.insert(meta.slug.clone(), meta);
        self
    }

    pub fn with_failing_recent(mut self, username: &str) -> Self {
        self.failing_recent.insert(username.to_string());
        self
    }

    pub fn with_problem_delay(mut self, delay: Duration) -> Self {
        self.problem_delay = Some(delay);
        self
    }

    pub fn problem_calls(&self) -> Vec<String> {
        self.problem_calls.lock().unwrap().clone()
    }
}

pub fn submission(slug: &str, timestamp: i64, status: &str) -> Submission {
    Submission {
        problem_id: slug.to_string(),
        title: slug.to_string(),
        timestamp,
        status: status.to_string(),
        lang: "rust".to_string(),
    }
}

pub fn problem(slug: &str, difficulty: &str, tags: &[&str]) -> ProblemMetadata {
    ProblemMetadata {
        slug: slug.to_string(),
        title: slug.to_string(),
        frontend_id: None,
        difficulty: Some(difficulty.to_string()).filter(|d| !d.is_empty()),
        topic_tags: tags
            .iter()
            .map(|t| TopicTag {
                slug: t.to_string(),
                name: t.to_string(),
            })
            .collect(),
    }
}

#[async_trait]
impl LeetCodeProvider for FakeProvider {
    async fn recent_submissions(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, ProviderError> {
        if self.failing_recent.contains(username) {
            return Err(ProviderError::Network("connection reset".to_string()));
        }
        let subs = self
            .submissions
            .get(username)
            .ok_or_else(|| ProviderError::NotFound(username.to_string()))?;
        Ok(subs.iter().take(limit).cloned().collect())
    }

    async fn user_profile(&self, username: &str) -> Result<UserProfile, ProviderError> {
        self.profiles
            .get(username)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(username.to_string()))
    }

    async fn contest_ranking(
        &self,
        _username: &str,
    ) -> Result<Option<ContestRanking>, ProviderError> {
        Ok(None)
    }

    async fn problem(&self, slug: &str) -> Result<ProblemMetadata, ProviderError> {
        self.problem_calls.lock().unwrap().push(slug.to_string());
        if let Some(delay) = self.problem_delay {
            tokio::time::sleep(delay).await;
        }
        self.problems
            .get(slug)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(slug.to_string()))
    }

    async fn session_user(
        &self,
        _session: &SessionCredential,
    ) -> Result<SessionUser, ProviderError> {
        Err(ProviderError::Unauthorized)
    }

    async fn submission_list(
        &self,
        _session: &SessionCredential,
        _offset: usize,
        _limit: usize,
    ) -> Result<SubmissionPage, ProviderError> {
        Err(ProviderError::Unauthorized)
    }

    async fn submission_detail(
        &self,
        _session: &SessionCredential,
        _submission_id: u64,
    ) -> Result<SubmissionDetail, ProviderError> {
        Err(ProviderError::Unauthorized)
    }
}
