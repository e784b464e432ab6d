use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, REFERER, USER_AGENT};
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::parse;
use super::queries;
use super::types::{
    ContestRanking, ProblemMetadata, SessionCredential, SessionUser, Submission,
    SubmissionDetail, SubmissionPage, UserProfile,
};
use super::{LeetCodeProvider, ProviderError};
use crate::config::ProviderConfig;

const CLIENT_USER_AGENT: &str = concat!("leetcode-insights/", env!("CARGO_PKG_VERSION"));

/// GraphQL client for leetcode.com.
#[derive(Debug, Clone)]
pub struct LeetCodeClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl LeetCodeClient {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.call_timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config: config.clone(),
            client,
        }
    }

    fn headers(&self, session: Option<&SessionCredential>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        if let Ok(referer) = HeaderValue::from_str(&self.config.base_url) {
            headers.insert(REFERER, referer);
        }
        if let Some(session) = session {
            if let Ok(cookie) = HeaderValue::from_str(&session.cookie_header()) {
                headers.insert(COOKIE, cookie);
            }
            if let Some(csrf) = session
                .csrf_token
                .as_deref()
                .and_then(|t| HeaderValue::from_str(t).ok())
            {
                headers.insert("x-csrftoken", csrf);
            }
        }
        headers
    }

    /// Posts one GraphQL operation and returns its `data` object.
    async fn graphql(
        &self,
        subject: &str,
        query: &str,
        variables: Value,
        session: Option<&SessionCredential>,
    ) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(&self.config.graphql_url)
            .headers(self.headers(session))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        extract_data(subject, body)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.call_timeout())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

fn classify_status(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized,
        StatusCode::NOT_FOUND => ProviderError::NotFound(body),
        other => ProviderError::Http {
            status: other.as_u16(),
            message: body.chars().take(200).collect(),
        },
    }
}

/// Splits a GraphQL envelope into `data`, or an error when the provider
/// reported one and sent nothing usable.
fn extract_data(subject: &str, mut body: Value) -> Result<Value, ProviderError> {
    let messages: Vec<String> = body
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let missing = messages.iter().any(|m| {
        let lower = m.to_ascii_lowercase();
        lower.contains("does not exist") || lower.contains("not found")
    });
    if missing {
        return Err(ProviderError::NotFound(subject.to_string()));
    }

    match body.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => {
            if !messages.is_empty() {
                tracing::warn!(subject, errors = ?messages, "Partial GraphQL errors");
            }
            Ok(data)
        }
        _ if !messages.is_empty() => Err(ProviderError::Malformed(messages.join("; "))),
        _ => Err(ProviderError::Malformed("response has no data".to_string())),
    }
}

#[async_trait]
impl LeetCodeProvider for LeetCodeClient {
    async fn recent_submissions(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, ProviderError> {
        let data = self
            .graphql(
                username,
                queries::RECENT_SUBMISSIONS,
                json!({ "username": username, "limit": limit }),
                None,
            )
            .await?;
        Ok(parse::parse_recent_submissions(&data))
    }

    async fn user_profile(&self, username: &str) -> Result<UserProfile, ProviderError> {
        let data = self
            .graphql(
                username,
                queries::USER_PROFILE,
                json!({ "username": username }),
                None,
            )
            .await?;
        parse::parse_user_profile(username, &data)
    }

    async fn contest_ranking(
        &self,
        username: &str,
    ) -> Result<Option<ContestRanking>, ProviderError> {
        let data = self
            .graphql(
                username,
                queries::CONTEST_RANKING,
                json!({ "username": username }),
                None,
            )
            .await?;
        Ok(parse::parse_contest_ranking(&data))
    }

    async fn problem(&self, slug: &str) -> Result<ProblemMetadata, ProviderError> {
        let data = self
            .graphql(slug, queries::PROBLEM, json!({ "titleSlug": slug }), None)
            .await?;
        parse::parse_problem(slug, &data)
    }

    async fn session_user(
        &self,
        session: &SessionCredential,
    ) -> Result<SessionUser, ProviderError> {
        let data = self
            .graphql("userStatus", queries::USER_STATUS, json!({}), Some(session))
            .await?;
        Ok(parse::parse_session_user(&data))
    }

    async fn submission_list(
        &self,
        session: &SessionCredential,
        offset: usize,
        limit: usize,
    ) -> Result<SubmissionPage, ProviderError> {
        let data = self
            .graphql(
                "submissionList",
                queries::SUBMISSION_LIST,
                json!({ "offset": offset, "limit": limit }),
                Some(session),
            )
            .await?;
        parse::parse_submission_page(&data)
    }

    async fn submission_detail(
        &self,
        session: &SessionCredential,
        submission_id: u64,
    ) -> Result<SubmissionDetail, ProviderError> {
        let data = self
            .graphql(
                &format!("submission {submission_id}"),
                queries::SUBMISSION_DETAIL,
                json!({ "submissionId": submission_id }),
                Some(session),
            )
            .await?;
        parse::parse_submission_detail(submission_id, &data)
    }
}
