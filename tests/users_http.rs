mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::app::spawn_test_app;
use common::fixtures::{problem, profile, submission, ScriptedProvider};
use common::http::{assert_json_error, get_json, request, response_json};
use leetcode_insights::leetcode::{ContestRanking, ProviderError, SubmissionDetail};

fn bob() -> ScriptedProvider {
    let subs = (0..25)
        .map(|i| {
            let status = if i % 2 == 0 { "Accepted" } else { "Wrong Answer" };
            submission(&format!("problem-{}", i % 5), 1_700_000_000 - i * 60, status)
        })
        .collect();
    ScriptedProvider::default()
        .user("bob", subs)
        .profile(profile("bob", 150, 400))
        .contest(
            "bob",
            ContestRanking {
                attended_contests_count: 7,
                rating: Some(1650.2),
                global_ranking: Some(40_000),
                top_percentage: Some(21.5),
            },
        )
}

#[tokio::test]
async fn it_user_overview() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["username"], "bob");
    assert_eq!(body["contest"]["attendedContestsCount"], 7);
    assert_eq!(body["recentSubmissions"].as_array().unwrap().len(), 20);
    assert!(body["fetchedAt"].is_string());
}

#[tokio::test]
async fn it_user_overview_unknown_user_is_404() {
    let app = spawn_test_app(ScriptedProvider::default());

    let (status, _, body) = get_json(&app.app, "/api/users/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
}

#[tokio::test]
async fn it_user_stats() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bob");
    assert_eq!(body["ranking"], 12_345);
    assert_eq!(body["totalSolved"], 150);
    assert_eq!(body["easySolved"], 150);
    assert_eq!(body["hardSolved"], 0);
    assert_eq!(body["totalSubmissions"], 400);
    assert_eq!(body["acceptanceRate"], 38);
    assert_eq!(body["badges"], json!([]));
}

#[tokio::test]
async fn it_recent_submissions_with_limit() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob/submissions?limit=4").await;
    assert_eq!(status, StatusCode::OK);

    let subs = body["submissions"].as_array().unwrap();
    assert_eq!(subs.len(), 4);
    assert_eq!(subs[0]["isAccepted"], true);
    assert_eq!(subs[0]["problemUrl"], "https://leetcode.com/problems/problem-0/");
    assert_eq!(subs[0]["submittedAt"], "2023-11-14T22:13:20.000Z");

    let analytics = &body["analytics"];
    assert_eq!(analytics["totalSubmissions"], 4);
    assert_eq!(analytics["acceptedSubmissions"], 2);
    assert_eq!(analytics["recentAcceptanceRate"], 50);
    assert_eq!(analytics["problemsSolved"], 2);
    assert_eq!(analytics["languages"], json!(["python3"]));
}

#[tokio::test]
async fn it_recent_submissions_limit_is_capped() {
    let app = spawn_test_app(bob());

    let (_, _, body) = get_json(&app.app, "/api/users/bob/submissions?limit=500").await;
    assert_eq!(body["submissions"].as_array().unwrap().len(), 20);

    let (_, _, body) = get_json(&app.app, "/api/users/bob/submissions").await;
    assert_eq!(body["submissions"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn it_dashboard() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "bob");
    assert_eq!(body["problemStats"]["totalSolved"], 150);
    assert_eq!(body["submissionAnalytics"]["totalSubmissions"], 400);
    assert_eq!(body["submissionAnalytics"]["acceptanceRate"], 38);
    assert_eq!(
        body["recentActivity"]["recentSubmissions"]
            .as_array()
            .unwrap()
            .len(),
        10
    );
    assert_eq!(body["recentActivity"]["recentAcceptanceRate"], 50);
    assert_eq!(body["contest"]["attended"], 7);
    assert_eq!(body["contest"]["ranking"], 40_000);
}

#[tokio::test]
async fn it_dashboard_without_contest_history() {
    let app = spawn_test_app(
        ScriptedProvider::default().user("carol", vec![submission("two-sum", 1, "Accepted")]),
    );

    let (status, _, body) = get_json(&app.app, "/api/users/carol/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["contest"].is_null());
    assert_eq!(body["recentActivity"]["problemsSolvedRecently"], 1);
}

#[tokio::test]
async fn it_problem_timeline() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob/problems/problem-0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problemSlug"], "problem-0");
    assert_eq!(body["problemTitle"], "Problem 0");

    // problem-0 appears at i = 0, 5, 10, 15 within the 20 most recent.
    let subs = body["submissions"].as_array().unwrap();
    assert_eq!(subs.len(), 4);
    assert_eq!(subs[0]["id"], "1700000000-python3");
    assert!(subs[0]["timeAgo"].as_str().unwrap().ends_with("ago"));

    let analytics = &body["analytics"];
    assert_eq!(analytics["totalSubmissions"], 4);
    assert_eq!(analytics["successfulSubmissions"], 2);
    assert_eq!(analytics["failedSubmissions"], 2);
    assert_eq!(analytics["successRate"], 50);
    assert_eq!(analytics["timeSpent"], "15m");
    assert_eq!(analytics["latestAttempt"]["timestamp"], 1_700_000_000);
    assert_eq!(analytics["firstAttempt"]["timestamp"], 1_700_000_000 - 15 * 60);
}

#[tokio::test]
async fn it_problem_timeline_without_attempts() {
    let app = spawn_test_app(bob().problem(problem("two-sum", "Easy", &["Array"])));

    let (status, _, body) = get_json(&app.app, "/api/users/bob/problems/two-sum").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problemTitle"], "Two Sum");
    assert_eq!(body["submissions"], json!([]));
    assert_eq!(body["message"], "No recent submissions found for this problem");
    assert!(body.get("analytics").is_none());
}

#[tokio::test]
async fn it_problem_timeline_unknown_problem_is_404() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob/problems/no-such-problem").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
}

#[tokio::test]
async fn it_problem_timeline_rejects_bad_slug() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob/problems/Two_Sum").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_PROBLEM_SLUG");
}

// ── Authenticated routes ──

async fn post_session(
    app: &axum::Router,
    username: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let resp = request(
        app,
        Method::POST,
        &format!("/api/users/{username}/submissions-auth"),
        Some(body),
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    (status, body)
}

#[tokio::test]
async fn it_authenticated_submissions_are_paged() {
    let app = spawn_test_app(
        bob()
            .session("cookie-bob", "Bob")
            .authenticated_submissions(45),
    );

    let (status, body) = post_session(&app.app, "bob", json!({ "sessionCookie": "cookie-bob" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 45);
    assert_eq!(body["authenticatedUser"], "Bob");
    assert_eq!(body["submissions"].as_array().unwrap().len(), 45);
    assert_eq!(body["submissions"][0]["titleSlug"], "problem-0");
    assert_eq!(app.provider.page_calls(), vec![(0, 20), (20, 20), (40, 20)]);
}

#[tokio::test]
async fn it_authenticated_submissions_stop_at_cap() {
    let app = spawn_test_app(
        bob()
            .session("cookie-bob", "bob")
            .authenticated_submissions(1_030),
    );

    let (status, body) = post_session(&app.app, "bob", json!({ "sessionCookie": "cookie-bob" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1_000);
    assert_eq!(app.provider.page_calls().len(), 50);
}

#[tokio::test]
async fn it_authenticated_submissions_reject_bad_sessions() {
    let app = spawn_test_app(bob().session("cookie-eve", "eve"));

    let (status, body) = post_session(&app.app, "bob", json!({ "sessionCookie": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "SESSION_REQUIRED");

    let (status, body) = post_session(&app.app, "bob", json!({ "sessionCookie": "stale" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");

    let (status, body) = post_session(&app.app, "bob", json!({ "sessionCookie": "cookie-eve" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("'eve'"));
}

#[tokio::test]
async fn it_authenticated_submissions_malformed_body_is_400() {
    let app = spawn_test_app(bob());

    let resp = request(
        &app.app,
        Method::POST,
        "/api/users/bob/submissions-auth",
        Some(json!({ "sessionCookie": 42 })),
        &[],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_REQUEST_BODY");
}

#[tokio::test]
async fn it_submission_detail_requires_session() {
    let app = spawn_test_app(bob());

    let (status, _, body) = get_json(&app.app, "/api/users/bob/submissions/42").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("LeetCode authentication"));
}

#[tokio::test]
async fn it_submission_detail_with_session() {
    let app = spawn_test_app(bob().session("cookie-bob", "bob").detail(SubmissionDetail {
        id: 42,
        title: Some("Two Sum".to_string()),
        title_slug: Some("two-sum".to_string()),
        code: "class Solution: pass".to_string(),
        lang: Some("python3".to_string()),
        runtime: Some("52 ms".to_string()),
        memory: Some("17.1 MB".to_string()),
        status_code: Some(10),
        timestamp: Some(1_700_000_000),
    }));

    let resp = request(
        &app.app,
        Method::GET,
        "/api/users/bob/submissions/42",
        None,
        &[("x-leetcode-session", "cookie-bob".to_string())],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submissionId"], 42);
    assert_eq!(body["submissionDetail"]["code"], "class Solution: pass");
    assert_eq!(body["submissionDetail"]["runtime"], "52 ms");

    let resp = request(
        &app.app,
        Method::GET,
        "/api/users/bob/submissions/abc",
        None,
        &[("x-leetcode-session", "cookie-bob".to_string())],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_SUBMISSION_ID");
}

#[tokio::test]
async fn it_submission_detail_unknown_id_is_404_naming_the_submission() {
    let app = spawn_test_app(bob().session("cookie-bob", "bob"));

    let resp = request(
        &app.app,
        Method::GET,
        "/api/users/bob/submissions/999",
        None,
        &[("x-leetcode-session", "cookie-bob".to_string())],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Submission 999"));
    assert!(!message.contains("User not found"));
}

#[tokio::test]
async fn it_submission_detail_rejected_session_is_401() {
    let app = spawn_test_app(bob().session("cookie-bob", "bob"));

    let resp = request(
        &app.app,
        Method::GET,
        "/api/users/bob/submissions/42",
        None,
        &[("x-leetcode-session", "expired".to_string())],
    )
    .await;
    let (status, _, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}

#[tokio::test]
async fn it_public_views_map_upstream_auth_refusal_to_500() {
    let app = spawn_test_app(
        ScriptedProvider::default().failing_user("alice", || ProviderError::Unauthorized),
    );

    for path in [
        "/api/users/alice",
        "/api/users/alice/stats",
        "/api/users/alice/dashboard",
        "/api/users/alice/submissions",
    ] {
        let (status, _, body) = get_json(&app.app, path).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_json_error(&body, "PROVIDER_ERROR");
    }
}
