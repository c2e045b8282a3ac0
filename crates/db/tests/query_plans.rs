//! Query plan checks.
//!
//! Runs `EXPLAIN QUERY PLAN` for the lookups on the hot paths (stream, profile,
//! photo detail, ban checks) and asserts that each one is served by an index.

#![allow(clippy::unwrap_used)]

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use shutter_db::test_utils::TestDatabase;

async fn plan(db: &TestDatabase, sql: &str) -> String {
    let rows = db
        .connection()
        .query_all(Statement::from_string(
            DbBackend::Sqlite,
            format!("EXPLAIN QUERY PLAN {sql}"),
        ))
        .await
        .unwrap();

    rows.iter()
        .map(|row| row.try_get::<String>("", "detail").unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn assert_uses_index(sql: &str, index: &str) {
    let db = TestDatabase::new().await.unwrap();
    let plan = plan(&db, sql).await;
    println!("{sql}\n{plan}\n");
    assert!(plan.contains(index), "expected {index} in plan:\n{plan}");
}

#[tokio::test]
async fn test_photos_by_owner_uses_index() {
    assert_uses_index(
        "SELECT photo_id FROM photos WHERE user_id = 'u1' ORDER BY timestamp DESC",
        "idx_photos_user_id",
    )
    .await;
}

#[tokio::test]
async fn test_following_lookup_uses_index() {
    assert_uses_index(
        "SELECT user_id FROM follows WHERE follower_id = 'u1'",
        "idx_follows_follower_id",
    )
    .await;
}

#[tokio::test]
async fn test_comments_for_photo_use_index() {
    assert_uses_index(
        "SELECT comment_id FROM comments WHERE photo_id = 'p1' ORDER BY timestamp DESC",
        "idx_comments_photo_id_timestamp",
    )
    .await;
}

#[tokio::test]
async fn test_like_count_uses_index() {
    assert_uses_index(
        "SELECT COUNT(*) FROM likes WHERE photo_id = 'p1'",
        "idx_likes_photo_id",
    )
    .await;
}

#[tokio::test]
async fn test_ban_pair_lookup_uses_index() {
    assert_uses_index(
        "SELECT ban_id FROM bans WHERE banned_by = 'a' AND banned_user = 'b'",
        "idx_bans_banned_by_banned_user",
    )
    .await;
}

#[tokio::test]
async fn test_reverse_ban_lookup_uses_index() {
    assert_uses_index(
        "SELECT banned_by FROM bans WHERE banned_user = 'a'",
        "idx_bans_banned_user",
    )
    .await;
}

#[tokio::test]
async fn test_username_lookup_uses_index() {
    assert_uses_index(
        "SELECT user_id FROM users WHERE username = 'Maria'",
        "idx_users_username",
    )
    .await;
}
