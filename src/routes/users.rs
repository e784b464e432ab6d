use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::activity::{
    acceptance_rate, problem_timeline, submission_analytics, ProblemStats, SubmissionAnalytics,
    SubmissionView, TimelineAnalytics, TimelineEntry,
};
use crate::constants::{
    AUTH_SUBMISSION_CAP, AUTH_SUBMISSION_PAGE_SIZE, DASHBOARD_RECENT_ITEMS, RECENT_WINDOW,
};
use crate::extractors::JsonBody;
use crate::leetcode::{
    bounded, problem_url, AuthenticatedSubmission, Badge, ContestRanking, Contributions,
    SessionCredential, Submission, SubmissionDetail, UserProfile,
};
use crate::response::AppError;
use crate::state::AppState;
use crate::validation::{parse_submission_id, validate_problem_slug};

use super::{checked_username, provider_failure, session_failure};

pub const SESSION_HEADER: &str = "x-leetcode-session";
pub const CSRF_HEADER: &str = "x-leetcode-csrf";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:username", get(get_user))
        .route("/:username/stats", get(get_stats))
        .route("/:username/submissions", get(get_submissions))
        .route("/:username/dashboard", get(get_dashboard))
        .route("/:username/problems/:slug", get(get_problem_submissions))
        .route("/:username/submissions-auth", post(post_authenticated_submissions))
        .route("/:username/submissions/:submission_id", get(get_submission_detail))
}

// ── Profile ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    pub profile: UserProfile,
    pub contest: Option<ContestRanking>,
    pub recent_submissions: Vec<Submission>,
    pub fetched_at: DateTime<Utc>,
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserOverview>, AppError> {
    let username = checked_username(&username)?;
    let provider = state.provider();
    let limit = state.call_timeout();

    let (profile, contest, recent_submissions) = futures::future::try_join3(
        bounded(limit, provider.user_profile(&username)),
        bounded(limit, provider.contest_ranking(&username)),
        bounded(limit, provider.recent_submissions(&username, RECENT_WINDOW)),
    )
    .await
    .map_err(|e| provider_failure("profile", &username, e))?;

    Ok(Json(UserOverview {
        profile,
        contest,
        recent_submissions,
        fetched_at: Utc::now(),
    }))
}

// ── Stats ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub username: String,
    pub ranking: Option<u64>,
    #[serde(flatten)]
    pub solved: ProblemStats,
    pub total_submissions: u64,
    pub acceptance_rate: u32,
    pub badges: Vec<Badge>,
    pub contributions: Option<Contributions>,
    pub fetched_at: DateTime<Utc>,
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserStats>, AppError> {
    let username = checked_username(&username)?;
    let profile = bounded(state.call_timeout(), state.provider().user_profile(&username))
        .await
        .map_err(|e| provider_failure("stats", &username, e))?;

    Ok(Json(UserStats {
        solved: ProblemStats::from(&profile),
        total_submissions: profile.submissions("All"),
        acceptance_rate: acceptance_rate(&profile),
        username: profile.username,
        ranking: profile.ranking,
        badges: profile.badges,
        contributions: profile.contributions,
        fetched_at: Utc::now(),
    }))
}

// ── Recent submissions ──

#[derive(Debug, Deserialize)]
pub struct SubmissionsQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSubmissions {
    pub username: String,
    pub submissions: Vec<SubmissionView>,
    pub analytics: SubmissionAnalytics,
    pub fetched_at: DateTime<Utc>,
}

pub async fn get_submissions(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<SubmissionsQuery>,
) -> Result<Json<RecentSubmissions>, AppError> {
    let username = checked_username(&username)?;
    let limit = query.limit.unwrap_or(RECENT_WINDOW).min(RECENT_WINDOW);

    let subs = bounded(
        state.call_timeout(),
        state.provider().recent_submissions(&username, limit),
    )
    .await
    .map_err(|e| provider_failure("submissions", &username, e))?;

    Ok(Json(RecentSubmissions {
        analytics: submission_analytics(&subs),
        submissions: subs.iter().map(SubmissionView::from).collect(),
        username,
        fetched_at: Utc::now(),
    }))
}

// ── Dashboard ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub username: String,
    pub real_name: Option<String>,
    pub avatar: Option<String>,
    pub ranking: Option<u64>,
    pub reputation: Option<i64>,
    pub about_me: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub skill_tags: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeSubmissions {
    pub total_submissions: u64,
    pub acceptance_rate: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub recent_submissions: Vec<SubmissionView>,
    pub languages: Vec<String>,
    pub recent_acceptance_rate: u32,
    pub problems_solved_recently: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestSummary {
    pub rating: Option<f64>,
    pub ranking: Option<u64>,
    pub attended: u32,
    pub top_percentage: Option<f64>,
}

impl From<ContestRanking> for ContestSummary {
    fn from(c: ContestRanking) -> Self {
        Self {
            rating: c.rating,
            ranking: c.global_ranking,
            attended: c.attended_contests_count,
            top_percentage: c.top_percentage,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: DashboardUser,
    pub problem_stats: ProblemStats,
    pub submission_analytics: LifetimeSubmissions,
    pub recent_activity: RecentActivity,
    pub contest: Option<ContestSummary>,
    pub badges: Vec<Badge>,
    pub contributions: Option<Contributions>,
    pub fetched_at: DateTime<Utc>,
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Dashboard>, AppError> {
    let username = checked_username(&username)?;
    let provider = state.provider();
    let limit = state.call_timeout();

    let (profile, contest, recent) = tokio::join!(
        bounded(limit, provider.user_profile(&username)),
        bounded(limit, provider.contest_ranking(&username)),
        bounded(limit, provider.recent_submissions(&username, RECENT_WINDOW)),
    );
    let profile = profile.map_err(|e| provider_failure("dashboard", &username, e))?;
    let recent = recent.map_err(|e| provider_failure("dashboard", &username, e))?;
    let contest = contest.unwrap_or_else(|e| {
        tracing::info!(%username, error = %e, "Contest info unavailable");
        None
    });

    let analytics = submission_analytics(&recent);

    Ok(Json(Dashboard {
        problem_stats: ProblemStats::from(&profile),
        submission_analytics: LifetimeSubmissions {
            total_submissions: profile.submissions("All"),
            acceptance_rate: acceptance_rate(&profile),
        },
        recent_activity: RecentActivity {
            recent_submissions: recent
                .iter()
                .take(DASHBOARD_RECENT_ITEMS)
                .map(SubmissionView::from)
                .collect(),
            languages: analytics.languages,
            recent_acceptance_rate: analytics.recent_acceptance_rate,
            problems_solved_recently: analytics.problems_solved,
        },
        contest: contest.map(ContestSummary::from),
        badges: profile.badges,
        contributions: profile.contributions,
        user: DashboardUser {
            username: profile.username,
            real_name: profile.real_name,
            avatar: profile.avatar,
            ranking: profile.ranking,
            reputation: profile.reputation,
            about_me: profile.about_me,
            location: profile.country,
            company: profile.company,
            school: profile.school,
            skill_tags: profile.skill_tags,
        },
        fetched_at: Utc::now(),
    }))
}

// ── Per-problem timeline ──

const NO_PROBLEM_SUBMISSIONS: &str = "No recent submissions found for this problem";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSubmissions {
    pub username: String,
    pub problem_slug: String,
    pub problem_title: String,
    pub problem_url: String,
    pub submissions: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<TimelineAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

pub async fn get_problem_submissions(
    State(state): State<AppState>,
    Path((username, slug)): Path<(String, String)>,
) -> Result<Json<ProblemSubmissions>, AppError> {
    let username = checked_username(&username)?;
    let slug = validate_problem_slug(&slug)
        .map_err(|msg| AppError::bad_request("INVALID_PROBLEM_SLUG", msg))?
        .to_string();

    let recent = bounded(
        state.call_timeout(),
        state.provider().recent_submissions(&username, RECENT_WINDOW),
    )
    .await
    .map_err(|e| provider_failure("problem timeline", &username, e))?;

    let url = problem_url(&slug);
    if let Some(timeline) = problem_timeline(&recent, &slug, Utc::now()) {
        return Ok(Json(ProblemSubmissions {
            username,
            problem_slug: slug,
            problem_title: timeline.title,
            problem_url: url,
            submissions: timeline.entries,
            analytics: Some(timeline.analytics),
            message: None,
            fetched_at: Utc::now(),
        }));
    }

    let problem = bounded(state.call_timeout(), state.provider().problem(&slug))
        .await
        .map_err(|e| {
            tracing::info!(%slug, error = %e, "Problem lookup failed");
            AppError::not_found("Problem not found or no submissions available")
        })?;

    Ok(Json(ProblemSubmissions {
        username,
        problem_title: problem.title,
        problem_slug: slug,
        problem_url: url,
        submissions: Vec::new(),
        analytics: None,
        message: Some(NO_PROBLEM_SUBMISSIONS.to_string()),
        fetched_at: Utc::now(),
    }))
}

// ── Authenticated submissions ──

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default)]
    session_cookie: String,
    csrf_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedSubmissions {
    pub success: bool,
    pub submissions: Vec<AuthenticatedSubmission>,
    pub total: usize,
    pub authenticated_user: String,
    pub message: String,
}

impl SessionRequest {
    /// `None` when no usable session cookie was sent.
    pub(crate) fn credential(self) -> Option<SessionCredential> {
        let session = self.session_cookie.trim();
        if session.is_empty() {
            return None;
        }
        Some(SessionCredential {
            session: session.to_string(),
            csrf_token: self.csrf_token.filter(|t| !t.trim().is_empty()),
        })
    }
}

pub(crate) fn session_required() -> AppError {
    AppError::bad_request("SESSION_REQUIRED", "Session cookie is required")
}

/// Walks the session's submission list page by page, newest first, up to
/// [`AUTH_SUBMISSION_CAP`] entries.
pub(crate) async fn collect_session_submissions(
    state: &AppState,
    credential: &SessionCredential,
    owner: &str,
) -> Result<Vec<AuthenticatedSubmission>, AppError> {
    let provider = state.provider();
    let mut submissions: Vec<AuthenticatedSubmission> = Vec::new();
    let mut offset = 0;
    while submissions.len() < AUTH_SUBMISSION_CAP {
        let page = bounded(
            state.call_timeout(),
            provider.submission_list(credential, offset, AUTH_SUBMISSION_PAGE_SIZE),
        )
        .await
        .map_err(|e| {
            session_failure("submission list", owner, "Submission list not found", e)
        })?;

        let fetched = page.submissions.len();
        submissions.extend(page.submissions);
        offset += fetched;
        if !page.has_next || fetched == 0 {
            break;
        }
    }
    submissions.truncate(AUTH_SUBMISSION_CAP);
    Ok(submissions)
}

pub async fn post_authenticated_submissions(
    State(state): State<AppState>,
    Path(username): Path<String>,
    JsonBody(req): JsonBody<SessionRequest>,
) -> Result<Json<AuthenticatedSubmissions>, AppError> {
    let username = checked_username(&username)?;
    let credential = req.credential().ok_or_else(session_required)?;

    let user = bounded(state.call_timeout(), state.provider().session_user(&credential))
        .await
        .map_err(|e| {
            session_failure("session check", &username, "LeetCode session not found", e)
        })?;
    if !user.signed_in {
        return Err(AppError::unauthorized(
            "Session cookie authentication failed",
        ));
    }
    let session_owner = user.username.clone().unwrap_or_default();
    if !user.matches(&username) {
        return Err(AppError::forbidden(&format!(
            "Session cookie is for user '{session_owner}', but requesting data for '{username}'"
        )));
    }

    let submissions = collect_session_submissions(&state, &credential, &username).await?;

    tracing::info!(%username, total = submissions.len(), "Fetched authenticated submissions");

    Ok(Json(AuthenticatedSubmissions {
        success: true,
        total: submissions.len(),
        message: format!("Successfully fetched {} submissions", submissions.len()),
        submissions,
        authenticated_user: session_owner,
    }))
}

// ── Submission detail ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetailResponse {
    pub username: String,
    pub submission_id: u64,
    pub submission_detail: SubmissionDetail,
    pub fetched_at: DateTime<Utc>,
}

fn session_from_headers(headers: &HeaderMap) -> Option<SessionCredential> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    header(SESSION_HEADER).map(|session| SessionCredential {
        session,
        csrf_token: header(CSRF_HEADER),
    })
}

pub async fn get_submission_detail(
    State(state): State<AppState>,
    Path((username, submission_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<SubmissionDetailResponse>, AppError> {
    let username = checked_username(&username)?;
    let submission_id = parse_submission_id(&submission_id)
        .map_err(|msg| AppError::bad_request("INVALID_SUBMISSION_ID", msg))?;

    let credential = session_from_headers(&headers).ok_or_else(|| {
        AppError::unauthorized(
            "Submission code requires LeetCode authentication: send your LEETCODE_SESSION cookie in the x-leetcode-session header",
        )
    })?;

    let detail = bounded(
        state.call_timeout(),
        state.provider().submission_detail(&credential, submission_id),
    )
    .await
    .map_err(|e| {
        session_failure(
            "submission detail",
            &username,
            &format!("Submission {submission_id} not found"),
            e,
        )
    })?;

    Ok(Json(SubmissionDetailResponse {
        username,
        submission_id,
        submission_detail: detail,
        fetched_at: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(session_from_headers(&headers).is_none());

        headers.insert(SESSION_HEADER, "  ".parse().unwrap());
        assert!(session_from_headers(&headers).is_none());

        headers.insert(SESSION_HEADER, "abc".parse().unwrap());
        headers.insert(CSRF_HEADER, "tok".parse().unwrap());
        let cred = session_from_headers(&headers).unwrap();
        assert_eq!(cred.session, "abc");
        assert_eq!(cred.csrf_token.as_deref(), Some("tok"));
    }

    #[test]
    fn contest_summary_renames_fields() {
        let summary = ContestSummary::from(ContestRanking {
            attended_contests_count: 12,
            rating: Some(1843.5),
            global_ranking: Some(20_000),
            top_percentage: Some(8.1),
        });
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["attended"], 12);
        assert_eq!(json["ranking"], 20_000);
        assert_eq!(json["topPercentage"], 8.1);
    }
}
