//! Converts loosely-typed GraphQL payloads into the strict types of
//! [`super::types`].
//!
//! The provider omits fields, sends numbers as strings and returns `null` for
//! whole objects. Payloads are first decoded into forgiving `Raw*` DTOs, then
//! converted with `TryFrom`, so every default is decided here and the
//! analytics code never has to inspect optional JSON by hand.

use serde::Deserialize;
use serde_json::Value;

use super::types::{
    AuthenticatedSubmission, Badge, ContestRanking, Contributions, DifficultyCount,
    ProblemMetadata, SessionUser, Submission, SubmissionDetail, SubmissionPage, TopicTag,
    UserProfile,
};
use super::ProviderError;

/// Field deserializers that never fail on a wrong JSON type; they yield
/// `None` (or an empty list) instead.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Trimmed, non-empty text. Numbers are accepted and rendered.
    pub fn string_of(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(string_of(&Value::deserialize(d)?))
    }

    /// Text kept byte for byte (source code).
    pub fn verbatim<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Integers arrive either as JSON numbers or as decimal strings.
    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
    }

    /// Rows are kept undecoded so one bad row cannot sink the whole list.
    pub fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Value>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(rows) => rows,
            _ => Vec::new(),
        })
    }
}

fn unsigned(n: Option<i64>) -> Option<u64> {
    n.and_then(|n| u64::try_from(n).ok())
}

fn decode<'a, T: Deserialize<'a>>(data: &'a Value, what: &str) -> Result<T, ProviderError> {
    T::deserialize(data).map_err(|e| ProviderError::Malformed(format!("{what}: {e}")))
}

/// Decodes and converts each row, dropping (and logging) the ones that fail.
fn rows<'a, R, T>(raw: &'a [Value], what: &'static str) -> Vec<T>
where
    R: Deserialize<'a>,
    T: TryFrom<R, Error = &'static str>,
{
    raw.iter()
        .filter_map(|row| {
            let converted = R::deserialize(row)
                .map_err(|_| "undecodable row")
                .and_then(T::try_from);
            match converted {
                Ok(item) => Some(item),
                Err(reason) => {
                    tracing::warn!(entry = %row, reason, "Dropping {what}");
                    None
                }
            }
        })
        .collect()
}

// ── Public submissions ──

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSubmission {
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    title_slug: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    timestamp: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    status_display: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    lang: Option<String>,
}

impl TryFrom<RawSubmission> for Submission {
    type Error = &'static str;

    fn try_from(raw: RawSubmission) -> Result<Self, Self::Error> {
        let problem_id = raw.title_slug.ok_or("missing slug")?;
        let timestamp = raw.timestamp.ok_or("missing timestamp")?;
        Ok(Submission {
            title: raw.title.unwrap_or_else(|| problem_id.clone()),
            problem_id,
            timestamp,
            // A missing status is treated as a non-accepted outcome.
            status: raw.status_display.unwrap_or_default(),
            lang: raw.lang.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecentSubmissionsData {
    #[serde(deserialize_with = "lenient::list")]
    recent_submission_list: Vec<Value>,
}

pub fn parse_recent_submissions(data: &Value) -> Vec<Submission> {
    match decode::<RecentSubmissionsData>(data, "recentSubmissionList") {
        Ok(envelope) => rows::<RawSubmission, _>(&envelope.recent_submission_list, "submission"),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable recent submission list");
            Vec::new()
        }
    }
}

// ── Problems ──

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTopicTag {
    #[serde(deserialize_with = "lenient::text")]
    slug: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    name: Option<String>,
}

impl TryFrom<RawTopicTag> for TopicTag {
    type Error = &'static str;

    fn try_from(raw: RawTopicTag) -> Result<Self, Self::Error> {
        let slug = raw.slug.ok_or("missing tag slug")?;
        Ok(TopicTag {
            name: raw.name.unwrap_or_else(|| slug.clone()),
            slug,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawQuestion {
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    title_slug: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    question_frontend_id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    difficulty: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    topic_tags: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuestionData {
    question: Option<RawQuestion>,
}

pub fn parse_problem(slug: &str, data: &Value) -> Result<ProblemMetadata, ProviderError> {
    let question = decode::<QuestionData>(data, "question")?
        .question
        .ok_or_else(|| ProviderError::NotFound(slug.to_string()))?;

    let mut topic_tags: Vec<TopicTag> = Vec::new();
    for tag in rows::<RawTopicTag, TopicTag>(&question.topic_tags, "topic tag") {
        // Tags behave as a set per problem.
        if !topic_tags.iter().any(|t| t.slug == tag.slug) {
            topic_tags.push(tag);
        }
    }

    Ok(ProblemMetadata {
        slug: question.title_slug.unwrap_or_else(|| slug.to_string()),
        title: question.title.unwrap_or_else(|| slug.to_string()),
        frontend_id: question.question_frontend_id,
        difficulty: question.difficulty,
        topic_tags,
    })
}

// ── Profiles ──

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDifficultyCount {
    #[serde(deserialize_with = "lenient::text")]
    difficulty: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    count: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    submissions: Option<i64>,
}

impl TryFrom<RawDifficultyCount> for DifficultyCount {
    type Error = &'static str;

    fn try_from(raw: RawDifficultyCount) -> Result<Self, Self::Error> {
        Ok(DifficultyCount {
            difficulty: raw.difficulty.ok_or("missing difficulty")?,
            count: unsigned(raw.count).unwrap_or(0),
            submissions: unsigned(raw.submissions).unwrap_or(0),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawBadge {
    #[serde(deserialize_with = "lenient::text")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    display_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    icon: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    creation_date: Option<String>,
}

impl TryFrom<RawBadge> for Badge {
    type Error = &'static str;

    fn try_from(raw: RawBadge) -> Result<Self, Self::Error> {
        Ok(Badge {
            id: raw.id.ok_or("missing badge id")?,
            display_name: raw.display_name.unwrap_or_default(),
            icon: raw.icon,
            creation_date: raw.creation_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawProfile {
    #[serde(deserialize_with = "lenient::text")]
    real_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    user_avatar: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    ranking: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    reputation: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    about_me: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    country_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    company: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    school: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    skill_tags: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSubmitStats {
    #[serde(deserialize_with = "lenient::list")]
    ac_submission_num: Vec<Value>,
    #[serde(deserialize_with = "lenient::list")]
    total_submission_num: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawContributions {
    #[serde(deserialize_with = "lenient::int")]
    points: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    question_count: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    testcase_count: Option<i64>,
}

impl From<RawContributions> for Contributions {
    fn from(raw: RawContributions) -> Self {
        Contributions {
            points: unsigned(raw.points).unwrap_or(0),
            question_count: unsigned(raw.question_count).unwrap_or(0),
            testcase_count: unsigned(raw.testcase_count).unwrap_or(0),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawUser {
    #[serde(deserialize_with = "lenient::text")]
    username: Option<String>,
    profile: Option<RawProfile>,
    submit_stats: Option<RawSubmitStats>,
    #[serde(deserialize_with = "lenient::list")]
    badges: Vec<Value>,
    contributions: Option<RawContributions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MatchedUserData {
    matched_user: Option<RawUser>,
}

pub fn parse_user_profile(username: &str, data: &Value) -> Result<UserProfile, ProviderError> {
    let user = decode::<MatchedUserData>(data, "matchedUser")?
        .matched_user
        .ok_or_else(|| ProviderError::NotFound(username.to_string()))?;
    let profile = user.profile.unwrap_or_default();
    let stats = user.submit_stats.unwrap_or_default();

    Ok(UserProfile {
        username: user.username.unwrap_or_else(|| username.to_string()),
        real_name: profile.real_name,
        avatar: profile.user_avatar,
        ranking: unsigned(profile.ranking),
        reputation: profile.reputation,
        about_me: profile.about_me,
        country: profile.country_name,
        company: profile.company,
        school: profile.school,
        skill_tags: profile.skill_tags.iter().filter_map(lenient::string_of).collect(),
        ac_submission_num: rows::<RawDifficultyCount, _>(&stats.ac_submission_num, "count"),
        total_submission_num: rows::<RawDifficultyCount, _>(&stats.total_submission_num, "count"),
        badges: rows::<RawBadge, _>(&user.badges, "badge"),
        contributions: user.contributions.map(Contributions::from),
    })
}

// ── Contests ──

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawContestRanking {
    #[serde(deserialize_with = "lenient::int")]
    attended_contests_count: Option<i64>,
    #[serde(deserialize_with = "lenient::float")]
    rating: Option<f64>,
    #[serde(deserialize_with = "lenient::int")]
    global_ranking: Option<i64>,
    #[serde(deserialize_with = "lenient::float")]
    top_percentage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContestData {
    user_contest_ranking: Option<RawContestRanking>,
}

pub fn parse_contest_ranking(data: &Value) -> Option<ContestRanking> {
    let ranking = decode::<ContestData>(data, "userContestRanking")
        .ok()?
        .user_contest_ranking?;
    Some(ContestRanking {
        attended_contests_count: unsigned(ranking.attended_contests_count)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        rating: ranking.rating,
        global_ranking: unsigned(ranking.global_ranking),
        top_percentage: ranking.top_percentage,
    })
}

// ── Authenticated views ──

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawUserStatus {
    #[serde(deserialize_with = "lenient::flag")]
    is_signed_in: bool,
    #[serde(deserialize_with = "lenient::text")]
    username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserStatusData {
    user_status: Option<RawUserStatus>,
}

pub fn parse_session_user(data: &Value) -> SessionUser {
    let status = decode::<UserStatusData>(data, "userStatus")
        .ok()
        .and_then(|d| d.user_status)
        .unwrap_or_default();
    SessionUser {
        signed_in: status.is_signed_in,
        username: status.username,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawListedSubmission {
    #[serde(deserialize_with = "lenient::int")]
    id: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    title_slug: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    timestamp: Option<i64>,
    #[serde(deserialize_with = "lenient::text")]
    status_display: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    lang: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    runtime: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    memory: Option<String>,
}

impl TryFrom<RawListedSubmission> for AuthenticatedSubmission {
    type Error = &'static str;

    fn try_from(raw: RawListedSubmission) -> Result<Self, Self::Error> {
        Ok(AuthenticatedSubmission {
            id: unsigned(raw.id).ok_or("missing id")?,
            title: raw.title.unwrap_or_default(),
            title_slug: raw.title_slug.ok_or("missing slug")?,
            timestamp: raw.timestamp.unwrap_or(0),
            status_display: raw.status_display.unwrap_or_default(),
            lang: raw.lang.unwrap_or_else(|| "unknown".to_string()),
            runtime: raw.runtime,
            memory: raw.memory,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSubmissionList {
    #[serde(deserialize_with = "lenient::flag")]
    has_next: bool,
    #[serde(deserialize_with = "lenient::list")]
    submissions: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SubmissionListData {
    submission_list: Option<RawSubmissionList>,
}

pub fn parse_submission_page(data: &Value) -> Result<SubmissionPage, ProviderError> {
    let list = decode::<SubmissionListData>(data, "submissionList")?
        .submission_list
        .ok_or_else(|| ProviderError::Malformed("submissionList missing".to_string()))?;

    Ok(SubmissionPage {
        has_next: list.has_next,
        submissions: rows::<RawListedSubmission, _>(&list.submissions, "listed submission"),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawQuestionRef {
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    title_slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSubmissionDetail {
    #[serde(deserialize_with = "lenient::verbatim")]
    code: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    runtime_display: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    memory_display: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    status_code: Option<i64>,
    #[serde(deserialize_with = "lenient::int")]
    timestamp: Option<i64>,
    /// Either `{ "name": .. }` or a bare string.
    lang: Value,
    question: Option<RawQuestionRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SubmissionDetailData {
    submission_details: Option<RawSubmissionDetail>,
}

pub fn parse_submission_detail(id: u64, data: &Value) -> Result<SubmissionDetail, ProviderError> {
    let detail = decode::<SubmissionDetailData>(data, "submissionDetails")?
        .submission_details
        .ok_or_else(|| ProviderError::NotFound(format!("submission {id}")))?;
    let question = detail.question.unwrap_or_default();

    Ok(SubmissionDetail {
        id,
        title: question.title,
        title_slug: question.title_slug,
        code: detail.code.unwrap_or_default(),
        lang: lenient::string_of(detail.lang.get("name").unwrap_or(&detail.lang)),
        runtime: detail.runtime_display,
        memory: detail.memory_display,
        status_code: detail.status_code,
        timestamp: detail.timestamp,
    })
}
