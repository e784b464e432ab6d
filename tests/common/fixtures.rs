use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use leetcode_insights::analytics::Throttle;
use leetcode_insights::leetcode::{
    AuthenticatedSubmission, ContestRanking, DifficultyCount, LeetCodeProvider, ProblemMetadata,
    ProviderError, SessionCredential, SessionUser, Submission, SubmissionDetail, SubmissionPage,
    TopicTag, UserProfile,
};

/// In-memory LeetCode used by the HTTP tests.
#[derive(Default)]
pub struct ScriptedProvider {
    submissions: HashMap<String, Vec<Submission>>,
    profiles: HashMap<String, UserProfile>,
    contests: HashMap<String, ContestRanking>,
    problems: HashMap<String, ProblemMetadata>,
    failing_problems: HashMap<String, ProviderError>,
    failing_users: HashMap<String, fn() -> ProviderError>,
    recent_delay: Option<Duration>,
    sessions: HashMap<String, String>,
    authenticated: Vec<AuthenticatedSubmission>,
    details: HashMap<u64, SubmissionDetail>,
    problem_calls: Mutex<Vec<String>>,
    page_calls: Mutex<Vec<(usize, usize)>>,
}

impl ScriptedProvider {
    pub fn user(mut self, username: &str, subs: Vec<Submission>) -> Self {
        self.submissions.insert(username.to_string(), subs);
        self.profiles
            .entry(username.to_string())
            .or_insert_with(|| profile(username, 0, 0));
        self
    }

    pub fn profile(mut self, profile: UserProfile) -> Self {
        self.profiles.insert(profile.username.clone(), profile);
        self
    }

    pub fn contest(mut self, username: &str, ranking: ContestRanking) -> Self {
        self.contests.insert(username.to_string(), ranking);
        self
    }

    pub fn problem(mut self, meta: ProblemMetadata) -> Self {
        self.problems.insert(meta.slug.clone(), meta);
        self
    }

    pub fn broken_problem(mut self, slug: &str) -> Self {
        self.failing_problems.insert(
            slug.to_string(),
            ProviderError::Http {
                status: 500,
                message: "boom".to_string(),
            },
        );
        self
    }

    pub fn failing_user(mut self, username: &str, err: fn() -> ProviderError) -> Self {
        self.failing_users.insert(username.to_string(), err);
        self
    }

    pub fn slow_recent(mut self, delay: Duration) -> Self {
        self.recent_delay = Some(delay);
        self
    }

    pub fn session(mut self, cookie: &str, username: &str) -> Self {
        self.sessions.insert(cookie.to_string(), username.to_string());
        self
    }

    pub fn authenticated_submissions(mut self, count: usize) -> Self {
        self.authenticated = (0..count)
            .map(|i| AuthenticatedSubmission {
                id: i as u64 + 1,
                title: format!("Problem {i}"),
                title_slug: format!("problem-{i}"),
                timestamp: 1_700_000_000 - i as i64,
                status_display: "Accepted".to_string(),
                lang: "rust".to_string(),
                runtime: Some("0 ms".to_string()),
                memory: Some("2.1 MB".to_string()),
            })
            .collect();
        self
    }

    pub fn detail(mut self, detail: SubmissionDetail) -> Self {
        self.details.insert(detail.id, detail);
        self
    }

    pub fn problem_calls(&self) -> Vec<String> {
        self.problem_calls.lock().unwrap().clone()
    }

    pub fn page_calls(&self) -> Vec<(usize, usize)> {
        self.page_calls.lock().unwrap().clone()
    }

    fn check_user(&self, username: &str) -> Result<(), ProviderError> {
        if let Some(err) = self.failing_users.get(username) {
            return Err(err());
        }
        if !self.profiles.contains_key(username) {
            return Err(ProviderError::NotFound(format!("user {username} does not exist")));
        }
        Ok(())
    }

    fn session_owner(&self, session: &SessionCredential) -> Result<&String, ProviderError> {
        self.sessions
            .get(&session.session)
            .ok_or(ProviderError::Unauthorized)
    }
}

#[async_trait]
impl LeetCodeProvider for ScriptedProvider {
    async fn recent_submissions(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, ProviderError> {
        if let Some(delay) = self.recent_delay {
            tokio::time::sleep(delay).await;
        }
        self.check_user(username)?;
        Ok(self
            .submissions
            .get(username)
            .map(|subs| subs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn user_profile(&self, username: &str) -> Result<UserProfile, ProviderError> {
        self.check_user(username)?;
        Ok(self.profiles[username].clone())
    }

    async fn contest_ranking(
        &self,
        username: &str,
    ) -> Result<Option<ContestRanking>, ProviderError> {
        self.check_user(username)?;
        Ok(self.contests.get(username).cloned())
    }

    async fn problem(&self, slug: &str) -> Result<ProblemMetadata, ProviderError> {
        self.problem_calls.lock().unwrap().push(slug.to_string());
        if let Some(err) = self.failing_problems.get(slug) {
            return Err(ProviderError::Malformed(err.to_string()));
        }
        self.problems
            .get(slug)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("question {slug} does not exist")))
    }

    async fn session_user(
        &self,
        session: &SessionCredential,
    ) -> Result<SessionUser, ProviderError> {
        Ok(match self.sessions.get(&session.session) {
            Some(owner) => SessionUser {
                signed_in: true,
                username: Some(owner.clone()),
            },
            None => SessionUser {
                signed_in: false,
                username: None,
            },
        })
    }

    async fn submission_list(
        &self,
        session: &SessionCredential,
        offset: usize,
        limit: usize,
    ) -> Result<SubmissionPage, ProviderError> {
        self.session_owner(session)?;
        self.page_calls.lock().unwrap().push((offset, limit));
        let end = (offset + limit).min(self.authenticated.len());
        let start = offset.min(end);
        Ok(SubmissionPage {
            has_next: end < self.authenticated.len(),
            submissions: self.authenticated[start..end].to_vec(),
        })
    }

    async fn submission_detail(
        &self,
        session: &SessionCredential,
        submission_id: u64,
    ) -> Result<SubmissionDetail, ProviderError> {
        self.session_owner(session)?;
        self.details
            .get(&submission_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("submission {submission_id}")))
    }
}

/// Throttle that records requested pauses without sleeping.
#[derive(Default)]
pub struct CountingThrottle {
    pauses: Mutex<Vec<Duration>>,
}

impl CountingThrottle {
    pub fn pauses(&self) -> usize {
        self.pauses.lock().unwrap().len()
    }
}

#[async_trait]
impl Throttle for CountingThrottle {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

pub fn submission(slug: &str, timestamp: i64, status: &str) -> Submission {
    Submission {
        problem_id: slug.to_string(),
        title: title_case(slug),
        timestamp,
        status: status.to_string(),
        lang: "python3".to_string(),
    }
}

pub fn problem(slug: &str, difficulty: &str, tags: &[&str]) -> ProblemMetadata {
    ProblemMetadata {
        slug: slug.to_string(),
        title: title_case(slug),
        frontend_id: None,
        difficulty: Some(difficulty.to_string()),
        topic_tags: tags
            .iter()
            .map(|t| TopicTag {
                slug: t.to_lowercase().replace(' ', "-"),
                name: t.to_string(),
            })
            .collect(),
    }
}

pub fn profile(username: &str, solved: u64, total: u64) -> UserProfile {
    let row = |difficulty: &str, count: u64| DifficultyCount {
        difficulty: difficulty.to_string(),
        count,
        submissions: count,
    };
    UserProfile {
        username: username.to_string(),
        ranking: Some(12_345),
        ac_submission_num: vec![row("All", solved), row("Easy", solved)],
        total_submission_num: vec![row("All", total)],
        ..UserProfile::default()
    }
}

fn title_case(slug: &str) -> String {
    slug.split('-')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
