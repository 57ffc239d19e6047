use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use mock_social_api::config::Config;
use mock_social_api::models::{comments::Comment, posts::Post, users::User};
use mock_social_api::routes::create_router;
use mock_social_api::store::{Database, JsonStore};
use mock_social_api::AppState;

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

fn fixture_user(id: u64, username: &str, password: &str, bookmarked_posts: Vec<u64>) -> User {
    let date = Utc.with_ymd_and_hms(2023, 6, id as u32, 0, 0, 0).unwrap();
    User {
        id,
        full_name: format!("{username} fixture"),
        username: username.to_string(),
        password: password.to_string(),
        email: format!("{username}@example.com"),
        about: "about".to_string(),
        avatar: "https://i.pravatar.cc/300".to_string(),
        cover: None,
        created_at: date,
        updated_at: date,
        friend_ids: vec![],
        bookmarked_posts,
    }
}

fn fixture_post(id: u64, user_id: u64, title: &str) -> Post {
    let date = Utc.with_ymd_and_hms(2023, 7, id as u32, 0, 0, 0).unwrap();
    Post {
        id,
        user_id,
        title: title.to_string(),
        body: "post body".to_string(),
        image_url: format!("https://picsum.photos/800/450?random={id}"),
        created_at: date,
        updated_at: date,
    }
}

fn fixture_comment(id: u64, post_id: u64, user_id: u64, body: &str) -> Comment {
    // Later ids are newer, so default updatedAt-desc ordering is testable.
    let date = Utc.with_ymd_and_hms(2023, 8, id as u32, 0, 0, 0).unwrap();
    Comment {
        id,
        post_id,
        user_id,
        body: body.to_string(),
        created_at: date,
        updated_at: date,
    }
}

fn app() -> Router {
    let db = Database {
        users: vec![
            fixture_user(1, "ada", "enchantress", vec![2]),
            fixture_user(2, "grace", "cobol", vec![]),
        ],
        posts: vec![
            fixture_post(1, 1, "banana"),
            fixture_post(2, 2, "apple"),
            fixture_post(3, 1, "cherry"),
        ],
        comments: vec![
            fixture_comment(1, 1, 2, "first"),
            fixture_comment(2, 1, 1, "second"),
        ],
    };

    let path = std::env::temp_dir().join(format!(
        "mock-social-api-test-{}-{}.json",
        std::process::id(),
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    ));
    let store = JsonStore::from_database(db, &path);
    let config = Config {
        port: 0,
        db_path: path.display().to_string(),
        delay_ms: 0,
        secret: "some secret text".to_string(),
    };

    create_router(Arc::new(AppState::new(config, store)))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value)?)
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body)?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, value))
}

fn assert_no_password(value: &Value) {
    match value {
        Value::Object(obj) => {
            assert!(!obj.contains_key("password"), "password leaked: {value}");
            obj.values().for_each(assert_no_password);
        }
        Value::Array(rows) => rows.iter().for_each(assert_no_password),
        _ => {}
    }
}

#[tokio::test]
async fn verify_accepts_only_the_secret() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/verify",
        Some(json!({ "secret": "some secret text" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Verified.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/verify",
        Some(json!({ "secret": "wrong" })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthentication");

    Ok(())
}

#[tokio::test]
async fn login_returns_secret_and_strips_password() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "username": "ada", "password": "enchantress" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["secret"], "some secret text");
    assert_eq!(body["username"], "ada");
    assert_no_password(&body);

    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_or_missing_credentials() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "username": "ada", "password": "nope" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Login failure!");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "username": "ada" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn register_creates_a_user() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/register",
        Some(json!({ "username": "linus", "email": "linus@example.com", "password": "kernel" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["secret"], "some secret text");
    assert_eq!(body["id"], 3);
    assert_eq!(body["friendIds"], json!([]));
    assert_eq!(body["bookmarkedPosts"], json!([]));
    assert_no_password(&body);

    // The new account can log in right away.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "username": "linus", "password": "kernel" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicates_and_missing_fields() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/register",
        Some(json!({ "username": "ada", "email": "new@example.com", "password": "pw" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "username already registered.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/register",
        Some(json!({ "username": "new", "email": "ada@example.com", "password": "pw" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/register",
        Some(json!({ "username": "new" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields.");

    Ok(())
}

#[tokio::test]
async fn bookmark_toggle_twice_restores_original_set() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/bookmark",
        Some(json!({ "postId": 3 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookmarkedPosts"], json!([2, 3]));
    assert_no_password(&body);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/bookmark",
        Some(json!({ "postId": 3 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookmarkedPosts"], json!([2]));

    Ok(())
}

#[tokio::test]
async fn bookmark_validates_user_post_and_body() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/bookmark",
        Some(json!({})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "postId is required");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/bookmark",
        Some(json!({ "postId": 999 })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/999/bookmark",
        Some(json!({ "postId": 1 })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    Ok(())
}

#[tokio::test]
async fn friends_replace_validates_every_id() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/friends",
        Some(json!({ "friendIds": [2] })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["friendIds"], json!([2]));
    assert_no_password(&body);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/friends",
        Some(json!({ "friendIds": [2, 99] })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid friendId(s) provided");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/users/1/friends",
        Some(json!({ "friendIds": "nope" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "friendIds must be an array");

    Ok(())
}

#[tokio::test]
async fn comment_edit_and_delete_are_author_only() -> Result<()> {
    let app = app();

    // Comment 1 belongs to user 2.
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/comments/1",
        Some(json!({ "userId": 1, "body": "hijack" })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/comments/1",
        Some(json!({ "userId": 2, "body": "edited" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"], "edited");

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/v1/comments/1",
        Some(json!({ "userId": 1 })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/api/v1/comments/1",
        Some(json!({ "userId": 2 })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment deleted");

    let (status, _) = send(&app, Method::GET, "/api/v1/comments/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn missing_comment_is_not_found() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/comments/999",
        Some(json!({ "userId": 1, "body": "x" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Comment not found");

    Ok(())
}

#[tokio::test]
async fn post_details_joins_everything_without_passwords() -> Result<()> {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/posts/1/details", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert!(body.get("userId").is_none());
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["comments"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["comments"][0]["user"]["id"], 2);
    assert_no_password(&body);

    let (status, _) = send(&app, Method::GET, "/api/v1/posts/999/details", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn user_details_joins_authored_posts_and_comments() -> Result<()> {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/users/1/details", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert_eq!(body["posts"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["comments"].as_array().map(Vec::len), Some(1));
    assert_no_password(&body);

    Ok(())
}

#[tokio::test]
async fn post_comments_come_newest_first_with_authors() -> Result<()> {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/posts/1/comments", None).await?;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array response");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 2);
    assert_eq!(rows[0]["user"]["id"], 1);
    assert_no_password(&body);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/posts/1/comments?_limit=1&_order=asc",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], 1);

    Ok(())
}

#[tokio::test]
async fn comment_creation_embeds_the_author() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/posts/1/comments",
        Some(json!({ "userId": 1, "body": "hey" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
    assert_eq!(body["postId"], 1);
    assert_eq!(body["user"]["id"], 1);
    assert_no_password(&body);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/posts/1/comments",
        Some(json!({ "userId": 1 })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userId and body are required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/posts/999/comments",
        Some(json!({ "userId": 1, "body": "hey" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn user_listing_never_exposes_passwords() -> Result<()> {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/users", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_no_password(&body);

    let (status, body) = send(&app, Method::GET, "/api/v1/users/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert_no_password(&body);

    Ok(())
}

#[tokio::test]
async fn listing_supports_sort_and_pagination() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/posts?_sort=title&_order=asc",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "apple");
    assert_eq!(body[2]["title"], "cherry");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/posts?_page=2&_limit=2&_sort=id",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], 3);

    Ok(())
}

#[tokio::test]
async fn generic_create_stamps_timestamps_and_assigns_ids() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/posts",
        Some(json!({
            "userId": 1,
            "title": "fresh",
            "body": "fresh body",
            "imageUrl": "https://picsum.photos/800/450?random=9"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 4);
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());

    let (status, body) = send(&app, Method::POST, "/api/v1/posts", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn generic_patch_merges_and_put_replaces() -> Result<()> {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/posts/1",
        Some(json!({ "title": "patched" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "patched");
    assert_eq!(body["body"], "post body");
    assert_ne!(body["updatedAt"], body["createdAt"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/posts/1",
        Some(json!({
            "userId": 2,
            "title": "replaced",
            "body": "replaced body",
            "imageUrl": "https://picsum.photos/800/450?random=1",
            "createdAt": "2023-07-01T00:00:00Z"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "replaced");
    assert_eq!(body["userId"], 2);

    Ok(())
}

#[tokio::test]
async fn generic_delete_removes_the_row() -> Result<()> {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/api/v1/posts/3", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = send(&app, Method::GET, "/api/v1/posts/3", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");

    Ok(())
}
