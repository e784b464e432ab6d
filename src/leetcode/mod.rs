//! Access to the LeetCode data provider.
//!
//! Handlers and the analytics pipeline only see [`LeetCodeProvider`]; the
//! production implementation is [`client::LeetCodeClient`], tests plug in an
//! in-memory fake.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;
pub mod parse;
pub mod queries;
pub mod types;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

pub use client::LeetCodeClient;
pub use types::{
    problem_url, AuthenticatedSubmission, Badge, ContestRanking, Contributions, Difficulty,
    DifficultyCount, ProblemMetadata, SessionCredential, SessionUser, Submission,
    SubmissionDetail, SubmissionPage, TopicTag, UserProfile,
};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("session is not authorized")]
    Unauthorized,
    #[error("provider rate limited the request")]
    RateLimited,
    #[error("provider returned status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("provider network error: {0}")]
    Network(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

#[async_trait]
pub trait LeetCodeProvider: Send + Sync {
    /// Most recent public submissions, as ordered by the provider.
    async fn recent_submissions(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, ProviderError>;

    async fn user_profile(&self, username: &str) -> Result<UserProfile, ProviderError>;

    /// `Ok(None)` when the user never took part in a contest.
    async fn contest_ranking(&self, username: &str)
        -> Result<Option<ContestRanking>, ProviderError>;

    async fn problem(&self, slug: &str) -> Result<ProblemMetadata, ProviderError>;

    async fn session_user(&self, session: &SessionCredential)
        -> Result<SessionUser, ProviderError>;

    async fn submission_list(
        &self,
        session: &SessionCredential,
        offset: usize,
        limit: usize,
    ) -> Result<SubmissionPage, ProviderError>;

    async fn submission_detail(
        &self,
        session: &SessionCredential,
        submission_id: u64,
    ) -> Result<SubmissionDetail, ProviderError>;
}

/// Runs a provider call under `limit`, turning an overrun into
/// [`ProviderError::Timeout`].
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(limit)),
    }
}
