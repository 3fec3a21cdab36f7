use super::*;
use std::{sync::Arc, time::Duration};

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::json;
use tokio::{net::TcpListener, sync::Notify};

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn filled_client(base_url: &str) -> CredentialClient {
    let client = CredentialClient::new(base_url).expect("client");
    client.update_field(Field::Email, "a@b.com");
    client.update_field(Field::Password, "x");
    client
}

#[test]
fn update_field_touches_only_the_named_field() {
    let client = CredentialClient::new(DEFAULT_BASE_URL).expect("client");

    client.update_field(Field::Email, "a@b.com");
    assert_eq!(client.form().email, "a@b.com");
    assert_eq!(client.form().password, "");

    client.update_field(Field::Password, "hunter2A1");
    assert_eq!(client.form().email, "a@b.com");
    assert_eq!(client.form().password, "hunter2A1");
}

#[test]
fn rejects_invalid_base_url() {
    let err = CredentialClient::new("not a url").expect_err("must fail");
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}

#[tokio::test]
async fn save_created_response_settles_as_success() {
    let base = serve(Router::new().route(
        "/crud/save_credentials",
        post(|| async { (StatusCode::CREATED, Json(json!({"id": 1}))) }),
    ))
    .await;
    let client = filled_client(&base);

    let outcome = client.submit_save().await;
    match &outcome {
        Outcome::Success(exchange) => {
            assert_eq!(exchange.status, 201);
            assert_eq!(exchange.status_text, "Created");
            assert_eq!(exchange.data, json!({"id": 1}));
        }
        other => panic!("expected success, got {other:?}"),
    }
    // The settled outcome is also stored on the controller.
    assert_eq!(client.outcome(), Some(outcome));
}

#[tokio::test]
async fn save_conflict_response_settles_as_failure() {
    let base = serve(Router::new().route(
        "/crud/save_credentials",
        post(|| async { (StatusCode::CONFLICT, Json(json!({"error": "exists"}))) }),
    ))
    .await;
    let client = filled_client(&base);

    let outcome = client.submit_save().await;
    match outcome {
        Outcome::Failure(exchange) => {
            assert_eq!(exchange.status, 409);
            assert_eq!(exchange.data, json!({"error": "exists"}));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn save_wraps_non_json_body_as_message() {
    let base = serve(Router::new().route(
        "/crud/save_credentials",
        post(|| async { "credentials saved" }),
    ))
    .await;
    let client = filled_client(&base);

    let outcome = client.submit_save().await;
    match outcome {
        Outcome::Success(exchange) => {
            assert_eq!(exchange.status, 200);
            assert_eq!(exchange.data, json!({"message": "credentials saved"}));
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn lookup_sends_only_the_email_field() {
    let seen = Arc::new(std::sync::Mutex::new(None));
    let seen_in = seen.clone();
    let base = serve(Router::new().route(
        "/crud/get_by_email",
        post(move |Json(body): Json<Value>| {
            let seen = seen_in.clone();
            async move {
                *seen.lock().unwrap() = Some(body);
                Json(json!({"email": "a@b.com", "password": "[REDACTED]"}))
            }
        }),
    ))
    .await;
    let client = filled_client(&base);

    let outcome = client.submit_lookup().await;
    assert!(outcome.is_success());
    assert_eq!(
        seen.lock().unwrap().take(),
        Some(json!({"email": "a@b.com"}))
    );
}

#[tokio::test]
async fn lookup_against_unreachable_host_settles_as_network_outcome() {
    // Grab a port that nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = filled_client(&format!("http://{addr}"));
    let outcome = client.submit_lookup().await;
    match outcome {
        Outcome::Network { message } => {
            assert!(message.starts_with("Network error:"), "message: {message}");
        }
        other => panic!("expected network outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn lookup_collapses_non_json_ok_body_into_network_outcome() {
    // The lookup path decodes JSON unconditionally; a plain-text 200 must
    // settle as the (misleading) network outcome.
    let base = serve(Router::new().route("/crud/get_by_email", post(|| async { "not json" }))).await;
    let client = filled_client(&base);

    let outcome = client.submit_lookup().await;
    assert!(outcome.is_network(), "got {outcome:?}");
}

#[tokio::test]
async fn outcome_is_empty_before_first_submit_and_after_clear() {
    let base = serve(Router::new().route(
        "/crud/save_credentials",
        post(|| async { (StatusCode::CREATED, Json(json!({"id": 1}))) }),
    ))
    .await;
    let client = filled_client(&base);

    assert!(client.outcome().is_none());
    client.submit_save().await;
    assert!(matches!(client.outcome(), Some(Outcome::Success(_))));

    client.clear_outcome();
    assert!(client.outcome().is_none());
    // Clear resets the display only; the form keeps its fields.
    assert_eq!(
        client.form(),
        FormState {
            email: "a@b.com".into(),
            password: "x".into(),
        }
    );
}

#[tokio::test]
async fn loading_is_true_only_while_a_request_is_in_flight() {
    let gate = Arc::new(Notify::new());
    let gate_in = gate.clone();
    let base = serve(Router::new().route(
        "/crud/save_credentials",
        post(move || {
            let gate = gate_in.clone();
            async move {
                gate.notified().await;
                (StatusCode::CREATED, Json(json!({"id": 1})))
            }
        }),
    ))
    .await;
    let client = Arc::new(filled_client(&base));
    assert!(!client.is_loading());

    let submit = tokio::spawn({
        let client = client.clone();
        async move { client.submit_save().await }
    });

    let mut polls = 0;
    while !client.is_loading() && polls < 1000 {
        tokio::time::sleep(Duration::from_millis(2)).await;
        polls += 1;
    }
    assert!(client.is_loading(), "submit never entered the loading state");
    // A fresh submit drops the previous outcome before settling.
    assert!(client.outcome().is_none());

    gate.notify_one();
    let outcome = submit.await.expect("join");
    assert!(outcome.is_success());
    assert!(!client.is_loading());
}
