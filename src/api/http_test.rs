use super::*;
use crate::types::Role;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

// =============================================================
// Endpoint paths
// =============================================================

#[test]
fn endpoints_format_expected_paths() {
    assert_eq!(chats_endpoint(), "/chats");
    assert_eq!(new_chat_endpoint(), "/chat/new");
    assert_eq!(chat_endpoint(42), "/chat/42");
    assert_eq!(chat_message_endpoint(42), "/chat/42/message");
}

#[test]
fn new_trims_base_url() {
    let cfg = ChatApiConfig { base_url: "http://localhost:81/".into(), ..ChatApiConfig::default() };
    let api = HttpChatApi::new(&cfg).unwrap();
    assert_eq!(api.base_url(), "http://localhost:81");
    assert_eq!(api.url("/chats"), "http://localhost:81/chats");
}

#[test]
fn new_rejects_invalid_base_url() {
    let cfg = ChatApiConfig { base_url: "not a url".into(), ..ChatApiConfig::default() };
    assert!(matches!(HttpChatApi::new(&cfg), Err(ApiError::Config(_))));
}

#[test]
fn decode_reports_parse_failure() {
    let err = decode::<ChatList>("<html>").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================
// In-process service
// =============================================================

async fn spawn_service(app: Router) -> HttpChatApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let cfg = ChatApiConfig { base_url: format!("http://{addr}"), ..ChatApiConfig::default() };
    HttpChatApi::new(&cfg).unwrap()
}

const BACKEND_MESSAGE_ID: u128 = 215_473_628_394_857_364_827_364_857_362_718_273_645;

fn chat_service() -> Router {
    Router::new()
        .route(
            "/chats",
            get(|| async {
                Json(json!({ "chats": [
                    { "id": 2, "title": "b", "created_at": "t2" },
                    { "id": 1, "title": "a", "last_message": "hi", "created_at": "t1" }
                ]}))
            }),
        )
        .route(
            "/chat/new",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "chat_id": 7,
                    "title": body["title"],
                    "created_at": format!("{}/{}", body["role"].as_str().unwrap_or(""), body["model_type"].as_str().unwrap_or("")),
                }))
            }),
        )
        .route(
            "/chat/{id}",
            get(|Path(id): Path<i64>| async move {
                Json(json!({
                    "chat_id": id,
                    "title": "Trip",
                    "created_at": "t0",
                    "messages": [
                        { "message_id": 1, "chat_id": id, "content": "persona", "role": "system", "timestamp": "t0" },
                        { "message_id": 2, "chat_id": id, "content": "hi", "role": "user", "timestamp": "t1" }
                    ]
                }))
            })
            .delete(|Path(_id): Path<i64>| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/chat/{id}/message",
            post(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                // Reply shape of the live backend: assistant answer, uuid-sized id.
                let reply = json!(format!("echo: {}", body["content"].as_str().unwrap_or("")));
                format!(
                    r#"{{"chat_id":{id},"message_id":{BACKEND_MESSAGE_ID},"content":{reply},"role":"assistant","timestamp":"2024-05-01T12:00:00"}}"#
                )
            }),
        )
}

#[tokio::test]
async fn list_chats_decodes_envelope() {
    let api = spawn_service(chat_service()).await;
    let chats = api.list_chats().await.unwrap();
    let ids: Vec<i64> = chats.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(chats[1].last_message.as_deref(), Some("hi"));
}

#[tokio::test]
async fn create_chat_posts_all_fields() {
    let api = spawn_service(chat_service()).await;
    let chat = api.create_chat("Trip planning", "user", "gpt").await.unwrap();
    assert_eq!(chat.id, 7);
    assert_eq!(chat.title, "Trip planning");
    assert_eq!(chat.created_at, "user/gpt");
}

#[tokio::test]
async fn chat_history_decodes_messages() {
    let api = spawn_service(chat_service()).await;
    let messages = api.chat_history(9).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.chat_id == 9));
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].id, 2);
}

#[tokio::test]
async fn send_message_decodes_backend_reply() {
    let api = spawn_service(chat_service()).await;
    let msg = api.send_message(7, "Hello").await.unwrap();
    assert_eq!(msg.id, BACKEND_MESSAGE_ID);
    assert_eq!(msg.chat_id, 7);
    assert_eq!(msg.content, "echo: Hello");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.created_at, "2024-05-01T12:00:00");
}

#[tokio::test]
async fn delete_chat_ignores_empty_body() {
    let api = spawn_service(chat_service()).await;
    api.delete_chat(3).await.unwrap();
}

// =============================================================
// Failure kinds
// =============================================================

#[tokio::test]
async fn non_success_status_is_error() {
    let app = Router::new().route("/chats", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }));
    let api = spawn_service(app).await;
    let err = api.list_chats().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, ref body } if body == "boom"));
}

#[tokio::test]
async fn delete_not_found_is_error() {
    let api = spawn_service(Router::new()).await;
    let err = api.delete_chat(3).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let app = Router::new().route("/chats", get(|| async { "not json" }));
    let api = spawn_service(app).await;
    let err = api.list_chats().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_service_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cfg = ChatApiConfig { base_url: format!("http://{addr}"), ..ChatApiConfig::default() };
    let api = HttpChatApi::new(&cfg).unwrap();
    let err = api.list_chats().await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
}
