use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use yomu_api::{Client, Error, Upload};
use yomu_lib::comment::build_tree;
use yomu_lib::models::{ChapterInput, LoginInput, MangaStatus};
use yomu_lib::search::{SearchFilter, SortBy};

const TOKEN: &str = "tok-123";

fn manga_json(id: i64, title: &str, genres: &[&str]) -> Value {
    json!({
        "id": id,
        "title": title,
        "author": "Eiichiro Oda",
        "genres": genres,
        "status": "ONGOING",
        "coverUrl": format!("/covers/{id}.jpg"),
        "chapterCount": 3,
        "followerCount": 10,
        "viewCount": 100,
        "createdAt": "2024-01-01T00:00:00"
    })
}

fn comment_json(id: i64, parent_id: Option<i64>, created_at: &str) -> Value {
    json!({
        "id": id,
        "mangaId": 1,
        "parentId": parent_id,
        "user": { "id": 2, "username": "nami" },
        "content": format!("comment {id}"),
        "createdAt": created_at
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "token": TOKEN,
                "user": { "id": 1, "username": body["username"], "role": "ADMIN" }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "bad credentials" })),
        )
    }
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    if authorized(&headers) {
        (
            StatusCode::OK,
            Json(json!({
                "id": 1,
                "username": "luffy",
                "email": "luffy@example.com",
                "role": "USER",
            })),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({})))
    }
}

async fn search(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let keyword = query.get("keyword").cloned().unwrap_or_default();
    let genres: Vec<String> = query
        .get("genres")
        .map(|genres| genres.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    let genres: Vec<&str> = genres.iter().map(String::as_str).collect();
    let page: i64 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);

    Json(json!({
        "content": [manga_json(1, &keyword, &genres)],
        "number": page,
        "size": 20,
        "totalElements": 21,
        "totalPages": 2,
        "sort": query.get("sort"),
    }))
}

async fn manga_detail(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 1 {
        (StatusCode::OK, Json(manga_json(1, "One Piece", &["Action"])))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "no manga" })))
    }
}

async fn comments(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    assert_eq!(query.get("mangaId").map(String::as_str), Some("1"));
    Json(json!([
        comment_json(1, None, "2024-01-01T10:00:00"),
        comment_json(2, Some(1), "2024-01-01T11:00:00"),
        comment_json(3, None, "2024-01-02T10:00:00"),
        comment_json(4, Some(2), "2024-01-02T12:00:00"),
    ]))
}

async fn upload_chapter(Path(manga_id): Path<i64>, mut multipart: Multipart) -> Json<Value> {
    let mut number = 0.0;
    let mut title = String::new();
    let mut pages = vec![];
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();
        match name.as_str() {
            "number" => number = String::from_utf8_lossy(&data).parse().unwrap(),
            "title" => title = String::from_utf8_lossy(&data).to_string(),
            "pages" => {
                assert_eq!(content_type.as_deref(), Some("image/png"));
                pages.push(file_name.unwrap_or_default());
            }
            other => panic!("unexpected field {other}"),
        }
    }

    Json(json!({
        "id": 55,
        "mangaId": manga_id,
        "number": number,
        "title": title,
        "pages": pages,
        "createdAt": "2024-01-03T00:00:00"
    }))
}

async fn follow(headers: HeaderMap) -> StatusCode {
    if authorized(&headers) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn following() -> Json<Value> {
    Json(json!({ "following": true }))
}

async fn admin_users() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": "admin only" })),
    )
}

async fn histories() -> Json<Value> {
    Json(json!([{
        "id": 1,
        "mangaId": 1,
        "mangaTitle": "One Piece",
        "chapterId": 55,
        "chapterNumber": 1.0,
        "lastPage": 4,
        "readAt": "2024-01-03T08:30:00"
    }]))
}

async fn notifications() -> Json<Value> {
    Json(json!([{
        "id": 9,
        "type": "NEW_CHAPTER",
        "title": "One Piece",
        "message": "Chapter 1100 is out",
        "mangaId": 1,
        "chapterId": 1100,
        "isRead": false,
        "createdAt": "2024-01-03T08:30:00"
    }]))
}

async fn spawn() -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/manga/search", get(search))
        .route("/manga/{id}", get(manga_detail))
        .route("/comments", get(comments))
        .route("/chapter/{manga_id}", post(upload_chapter))
        .route("/follow/{manga_id}", get(following).post(follow).delete(follow))
        .route("/admin/users", get(admin_users))
        .route("/history", get(histories))
        .route("/notifications", get(notifications));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_login_and_me() {
    let base_url = spawn().await;
    let client = Client::new(base_url);

    let err = client
        .login(&LoginInput {
            username: "luffy".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    let auth = client
        .login(&LoginInput {
            username: "luffy".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(auth.token, TOKEN);
    assert!(auth.user.role.is_admin());

    assert!(client.me().await.unwrap_err().is_unauthorized());

    let client = client.with_token(Some(auth.token));
    let me = client.me().await.unwrap();
    assert_eq!(me.username, "luffy");
    assert_eq!(me.email, "luffy@example.com");
}

#[tokio::test]
async fn test_search_sends_filter() {
    let client = Client::new(spawn().await);
    let filter = SearchFilter {
        keyword: Some("one piece".to_string()),
        genres: vec!["Action".to_string(), "Comedy".to_string()],
        status: Some(MangaStatus::Ongoing),
        sort: SortBy::Popular,
    };

    let page = client.search_manga(&filter, 1).await.unwrap();
    assert_eq!(page.number, 1);
    assert!(!page.has_next());
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].title, "one piece");
    assert_eq!(page.content[0].genres, vec!["Action", "Comedy"]);
}

#[tokio::test]
async fn test_manga_not_found() {
    let client = Client::new(spawn().await);

    let manga = client.manga(1).await.unwrap();
    assert_eq!(manga.title, "One Piece");
    assert!(matches!(client.manga(2).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_comments_build_into_tree() {
    let client = Client::new(spawn().await);

    let comments = client.comments(1, None).await.unwrap();
    let tree = build_tree(comments);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].comment.id, 3);
    assert_eq!(tree[1].comment.id, 1);
    assert_eq!(tree[1].replies[0].comment.id, 2);
    assert_eq!(tree[1].replies[0].replies[0].comment.id, 4);
}

#[tokio::test]
async fn test_upload_chapter_keeps_page_order() {
    let client = Client::new(spawn().await).with_token(Some(TOKEN.to_string()));
    let pages = vec![
        Upload::new("001.png", vec![1, 2, 3]),
        Upload::new("002.png", vec![4, 5, 6]),
        Upload::new("010.png", vec![7]),
    ];

    let chapter = client
        .upload_chapter(
            7,
            &ChapterInput {
                number: 12.5,
                title: "Extra".to_string(),
            },
            pages,
        )
        .await
        .unwrap();

    assert_eq!(chapter.manga_id, 7);
    assert_eq!(chapter.number, 12.5);
    assert_eq!(chapter.pages, vec!["001.png", "002.png", "010.png"]);
}

#[tokio::test]
async fn test_follow_requires_token() {
    let anonymous = Client::new(spawn().await);
    assert!(anonymous.follow(1).await.unwrap_err().is_unauthorized());

    let client = anonymous.with_token(Some(TOKEN.to_string()));
    client.follow(1).await.unwrap();
    client.unfollow(1).await.unwrap();
    assert!(client.is_following(1).await.unwrap());
}

#[tokio::test]
async fn test_forbidden_carries_message() {
    let client = Client::new(spawn().await);
    match client.users().await {
        Err(Error::Forbidden(message)) => assert_eq!(message, "admin only"),
        other => panic!("expected forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn test_history_and_notifications() {
    let client = Client::new(spawn().await);

    let histories = client.histories().await.unwrap();
    assert_eq!(histories[0].last_page, 4);

    let notifications = client.notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(!notifications[0].is_read);
}
