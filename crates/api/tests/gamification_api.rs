//! Integration tests for the `/gamification` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, post_raw_auth, register};
use serde_json::json;
use sqlx::PgPool;

const PROGRESS: &str = "/api/v1/gamification";
const PRACTICE: &str = "/api/v1/gamification/practice";
const RESET: &str = "/api/v1/gamification/reset";

async fn practice(pool: &PgPool, token: &str, set_id: i64, was_correct: bool) -> serde_json::Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PRACTICE,
        json!({ "set_id": set_id, "was_correct": was_correct }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn progress_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM gamification_progress")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// GET /gamification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_is_null_before_first_practice(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;

    let response = get_auth(common::build_test_app(pool), PROGRESS, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_requires_auth(pool: PgPool) {
    let response = get(common::build_test_app(pool.clone()), PROGRESS).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        common::build_test_app(pool),
        PRACTICE,
        json!({ "set_id": 1, "was_correct": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// POST /gamification/practice
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_correct_answer_creates_progress(pool: PgPool) {
    let (token, user_id) = register(&pool, "learner").await;

    let json = practice(&pool, &token, 7, true).await;

    let data = &json["data"];
    assert_eq!(data["xp_gain"], 12);
    let progress = &data["progress"];
    assert_eq!(progress["user_id"], user_id);
    assert_eq!(progress["total_xp"], 12);
    assert_eq!(progress["level"], 1);
    assert_eq!(progress["tier"], "novice");
    assert_eq!(progress["daily_streak"], 1);
    assert!(progress["last_practice_day"].is_string());

    let sets = progress["set_progress"].as_array().unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0]["set_id"], 7);
    assert_eq!(sets[0]["attempts"], 1);
    assert_eq!(sets[0]["correct"], 1);
    assert_eq!(sets[0]["streak"], 1);
    assert_eq!(sets[0]["mastery"], 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn streak_bonus_grows_then_resets_on_miss(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;

    assert_eq!(practice(&pool, &token, 3, true).await["data"]["xp_gain"], 12);
    assert_eq!(practice(&pool, &token, 3, true).await["data"]["xp_gain"], 14);
    let json = practice(&pool, &token, 3, false).await;

    let data = &json["data"];
    assert_eq!(data["xp_gain"], 2);
    assert_eq!(data["progress"]["total_xp"], 28);
    // Same day: the daily streak does not move.
    assert_eq!(data["progress"]["daily_streak"], 1);

    let entry = &data["progress"]["set_progress"][0];
    assert_eq!(entry["attempts"], 3);
    assert_eq!(entry["correct"], 2);
    assert_eq!(entry["streak"], 0);
    assert_eq!(entry["mastery"], 67);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn practice_accepts_camel_case_fields(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        PRACTICE,
        json!({ "setId": 9, "wasCorrect": false }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["xp_gain"], 2);
    assert_eq!(json["data"]["progress"]["set_progress"][0]["set_id"], 9);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_set_id_is_rejected_without_persisting(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PRACTICE,
        json!({ "was_correct": true }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(progress_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_flag_and_bad_set_id_are_rejected(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;

    for body in [
        json!({ "set_id": 4 }),
        json!({ "set_id": 0, "was_correct": true }),
        json!({ "set_id": -2, "was_correct": true }),
    ] {
        let response =
            post_json_auth(common::build_test_app(pool.clone()), PRACTICE, body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(progress_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_boolean_flag_is_rejected(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        PRACTICE,
        json!({ "set_id": 4, "was_correct": "yes" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(progress_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_rejected(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;

    let response =
        post_raw_auth(common::build_test_app(pool.clone()), PRACTICE, "{not json", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(progress_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_is_isolated_per_user(pool: PgPool) {
    let (alice, _) = register(&pool, "alice").await;
    let (bob, _) = register(&pool, "bob").await;

    practice(&pool, &alice, 1, true).await;

    let response = get_auth(common::build_test_app(pool.clone()), PROGRESS, &bob).await;
    assert!(body_json(response).await["data"].is_null());

    let response = get_auth(common::build_test_app(pool), PROGRESS, &alice).await;
    assert_eq!(body_json(response).await["data"]["total_xp"], 12);
}

// ---------------------------------------------------------------------------
// POST /gamification/reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_deletes_progress_and_is_idempotent(pool: PgPool) {
    let (token, _) = register(&pool, "learner").await;
    practice(&pool, &token, 1, true).await;

    for _ in 0..2 {
        let response =
            post_json_auth(common::build_test_app(pool.clone()), RESET, json!({}), &token).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["reset"], true);
    }

    let response = get_auth(common::build_test_app(pool.clone()), PROGRESS, &token).await;
    assert!(body_json(response).await["data"].is_null());

    // The next attempt starts from scratch.
    let json = practice(&pool, &token, 1, true).await;
    assert_eq!(json["data"]["progress"]["total_xp"], 12);
    assert_eq!(json["data"]["progress"]["daily_streak"], 1);
}
