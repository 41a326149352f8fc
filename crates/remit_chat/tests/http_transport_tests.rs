//! Integration tests for the HTTP transport against an in-process agent API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use remit_chat::{
    ChatClient, ChatConfig, ChatError, HttpTransport, InputMode, Role, SendOutcome, SessionPhase,
    Transport, TransportError,
};

/// Messages received by the fake agent, in order.
type Received = Arc<Mutex<Vec<Value>>>;

async fn create_session() -> Json<Value> {
    Json(json!({"session_id": "abc", "message": "Session created successfully"}))
}

async fn chat(State(received): State<Received>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    received.lock().push(body.clone());
    let message = body["message"].as_str().unwrap_or_default();

    match message {
        "x" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "model unavailable"})),
        ),
        "send 100" => (
            StatusCode::OK,
            Json(json!({
                "session_id": "abc",
                "response": "Which currency?",
                "state": {
                    "currency": "USD",
                    "needs_clarification": true,
                    "clarification_options": [
                        {"label": "USD", "value": "USD"},
                        {"label": "EUR", "value": "EUR"}
                    ]
                }
            })),
        ),
        "USD" => (
            StatusCode::OK,
            Json(json!({
                "session_id": "abc",
                "response": "100 USD it is. Who is it for?",
                "state": {"amount": 100.0, "currency": "USD", "needs_clarification": false}
            })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "session_id": "abc",
                "response": "Which country?",
                "state": {"needs_clarification": false}
            })),
        ),
    }
}

async fn session_state(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "abc" {
        (
            StatusCode::OK,
            Json(json!({"session_id": "abc", "state": {"beneficiary_name": "Ana Silva"}})),
        )
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"detail": "Session not found"})))
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": "Send Money Agent"}))
}

async fn spawn_agent(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn fake_agent() -> (SocketAddr, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/", get(health))
        .route("/session/create", post(create_session))
        .route("/chat", post(chat))
        .route("/session/:id/state", get(session_state))
        .with_state(received.clone());
    (spawn_agent(router).await, received)
}

fn transport_for(addr: SocketAddr) -> HttpTransport {
    let config = ChatConfig::new(format!("http://{}/", addr)).validated().unwrap();
    HttpTransport::new(config).unwrap()
}

/// Address nothing is listening on.
async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[tokio::test]
async fn test_full_conversation_over_http() {
    let (addr, received) = fake_agent().await;
    let client = ChatClient::new(transport_for(addr));

    assert_eq!(client.initialize().await.unwrap(), "abc");
    assert_eq!(client.input_mode(), InputMode::FreeText);

    let outcome = client.send("John Smith").await;
    assert!(outcome.is_delivered());
    assert!(client.transfer_state().unwrap().beneficiary_name.is_none());

    let outcome = client.send("send 100").await;
    match outcome {
        SendOutcome::Delivered(InputMode::Clarification(options)) => {
            let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
            assert_eq!(labels, vec!["USD", "EUR"]);
        }
        other => panic!("expected clarification, got {:?}", other),
    }

    let outcome = client.choose_option(0).await;
    assert!(matches!(outcome, SendOutcome::Delivered(InputMode::FreeText)));
    assert_eq!(client.transfer_state().unwrap().amount, Some(100.0));

    let turns = client.turns();
    assert_eq!(turns.len(), 7);
    assert_eq!(turns[5].content, "USD");

    let bodies = received.lock().clone();
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[2], json!({"session_id": "abc", "message": "USD"}));
}

#[tokio::test]
async fn test_server_error_on_chat_is_send_failure() {
    let (addr, _) = fake_agent().await;
    let client = ChatClient::new(transport_for(addr));
    client.initialize().await.unwrap();

    client.send("send 100").await;
    let before = client.transfer_state();

    let outcome = client.send("x").await;
    match outcome {
        SendOutcome::Failed(ChatError::Send(err)) => assert_eq!(err.status(), Some(500)),
        other => panic!("expected send failure, got {:?}", other),
    }

    let turns = client.turns();
    let last_two: Vec<_> = turns[turns.len() - 2..]
        .iter()
        .map(|t| (t.role, t.content.clone()))
        .collect();
    assert_eq!(last_two[0], (Role::User, "x".to_string()));
    assert_eq!(last_two[1].0, Role::Error);
    assert!(last_two[1].1.starts_with("Sorry, there was an error"));
    assert_eq!(client.transfer_state(), before);
    assert!(client.input_mode().is_clarification());
}

#[tokio::test]
async fn test_unreachable_server_fails_initialize() {
    let addr = closed_addr().await;
    let client = ChatClient::new(transport_for(addr));

    let err = client.initialize().await.unwrap_err();
    assert!(matches!(err, ChatError::SessionInit(TransportError::Network(_))));
    assert_eq!(client.phase(), SessionPhase::Failed);

    let turns = client.turns();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::Error);
    assert!(turns[0].content.starts_with("Failed to connect"));

    assert!(client.send("hello").await.is_skipped());
    assert_eq!(client.turns().len(), 1);
}

#[tokio::test]
async fn test_non_success_status_fails_regardless_of_body() {
    let router = Router::new().route(
        "/session/create",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"session_id": "abc"}))) }),
    );
    let addr = spawn_agent(router).await;

    let err = transport_for(addr).create_session().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let router = Router::new().route("/session/create", post(|| async { "not json" }));
    let addr = spawn_agent(router).await;

    let err = transport_for(addr).create_session().await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn test_health_and_state_lookup() {
    let (addr, _) = fake_agent().await;
    let transport = transport_for(addr);

    let health = transport.health().await.unwrap();
    assert!(health.is_ok());

    let state = transport.fetch_state("abc").await.unwrap();
    assert_eq!(state.beneficiary_name.as_deref(), Some("Ana Silva"));

    let err = transport.fetch_state("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
