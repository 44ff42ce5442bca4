//! End-to-end tests of the default HTTP caller against a local axum server.

use std::time::Duration;

use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use telego_client::{
    Bot, BotError, InputFile, SendDocumentParams, SendMessageParams, options,
};

const TOKEN: &str = "1234567890:aaaabbbbaaaabbbbaaaabbbbaaaabbbbccc";

fn app() -> Router {
    Router::new()
        .route("/{bot}/getMe", post(get_me))
        .route("/{bot}/sendMessage", post(send_message))
        .route("/{bot}/sendDocument", post(send_document))
        .route("/{bot}/failing", post(failing))
        .route("/{bot}/garbage", post(garbage))
        .route("/{bot}/slow", post(slow))
}

async fn get_me(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(body, json!({}));
    Json(json!({
        "ok": true,
        "result": {"id": 1234567890, "is_bot": true, "first_name": "Test", "username": "test_bot"}
    }))
}

async fn send_message(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "result": {
            "message_id": 1,
            "date": 1700000000,
            "chat": {"id": body["chat_id"], "type": "private"},
            "text": body["text"],
        }
    }))
}

async fn send_document(mut multipart: Multipart) -> Json<Value> {
    let mut chat_id = Value::Null;
    let mut caption = Value::Null;
    let mut document = Value::Null;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        match (name.as_str(), file_name) {
            ("document", Some(file_name)) => {
                let data = field.bytes().await.unwrap();
                document = json!({
                    "file_id": "f1",
                    "file_unique_id": "u1",
                    "file_name": file_name,
                    "file_size": data.len(),
                });
            }
            ("chat_id", None) => {
                let text = field.text().await.unwrap();
                chat_id = json!(text.parse::<i64>().unwrap());
            }
            ("caption", None) => caption = json!(field.text().await.unwrap()),
            (other, _) => panic!("unexpected field {other}"),
        }
    }

    Json(json!({
        "ok": true,
        "result": {
            "message_id": 2,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private"},
            "caption": caption,
            "document": document,
        }
    }))
}

async fn failing() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"})),
    )
}

async fn garbage() -> (StatusCode, &'static str) {
    (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"ok": true, "result": true}))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

async fn serve() -> String {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn bot() -> Bot {
    let url = serve().await;
    Bot::builder(TOKEN).api_url(url).build().unwrap()
}

#[tokio::test]
async fn get_me_over_http() {
    let bot = bot().await;

    let me = bot.get_me().await.unwrap();
    assert_eq!(me.id, 1234567890);
    assert!(me.is_bot);
    assert_eq!(me.username.as_deref(), Some("test_bot"));
}

#[tokio::test]
async fn send_message_over_http() {
    let bot = bot().await;

    let message = bot
        .send_message(&SendMessageParams::new(42i64, "hello"))
        .await
        .unwrap();
    assert_eq!(message.chat.id, 42);
    assert_eq!(message.text.as_deref(), Some("hello"));
}

#[tokio::test]
async fn send_document_from_memory() {
    let bot = bot().await;

    let mut params = SendDocumentParams::new(
        42i64,
        InputFile::from_bytes("notes.txt", &b"some notes"[..]),
    );
    params.caption = Some("weekly".into());

    let message = bot.send_document(&params).await.unwrap();
    assert_eq!(message.chat.id, 42);
    assert_eq!(message.caption.as_deref(), Some("weekly"));
    let document = message.document.unwrap();
    assert_eq!(document.file_name.as_deref(), Some("notes.txt"));
    assert_eq!(document.file_size, Some(10));
}

#[tokio::test]
async fn send_document_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let bot = bot().await;
    let message = bot
        .send_document(&SendDocumentParams::new(7i64, InputFile::from_path(&path)))
        .await
        .unwrap();

    let document = message.document.unwrap();
    assert_eq!(document.file_name.as_deref(), Some("report.csv"));
    assert_eq!(document.file_size, Some(8));
}

#[tokio::test]
async fn error_envelope_with_http_error_status() {
    let bot = bot().await;

    let err = bot.perform_discard("failing", &()).await.unwrap_err();
    let api = err.api_error().unwrap();
    assert_eq!(api.code(), 400);
    assert_eq!(api.description(), "Bad Request: chat not found");
}

#[tokio::test]
async fn non_envelope_body_is_transport_error() {
    let bot = bot().await;

    let err = bot.perform_discard("garbage", &()).await.unwrap_err();
    assert!(matches!(err, BotError::Transport(msg) if msg.contains("502")));
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let bot = Bot::builder(TOKEN)
        .api_url(format!("http://{}", addr))
        .build()
        .unwrap();

    let err = bot.perform_discard("getMe", &()).await.unwrap_err();
    assert!(matches!(err, BotError::Transport(_)));
}

#[tokio::test]
async fn timeout_is_transport_error() {
    let url = serve().await;
    let bot = Bot::builder(TOKEN)
        .with_option(options::with_api_url(url))
        .with_option(options::with_timeout(Duration::from_millis(200)))
        .build()
        .unwrap();

    let err = bot.perform_discard("slow", &()).await.unwrap_err();
    assert!(matches!(err, BotError::Transport(msg) if msg.contains("timed out")));
}
