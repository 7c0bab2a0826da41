//! Shared test harness for collection backend testing
//!
//! Provides a mock console backend served by a real axum server on a random
//! local port, plus fixtures for the record types used across test files.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod contract;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use listview::config::{CollectionEndpoints, UpdateMethod};
use listview::core::{CollectionService, Mutation};
use listview::resources::{Faq, Order};
use listview::storage::{InMemoryCollection, RestCollection};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

// ---------------------------------------------------------------------------
// Server plumbing
// ---------------------------------------------------------------------------

/// Serve `router` on a random local port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn rejected(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"success": false, "message": message})))
}

// ---------------------------------------------------------------------------
// Mock FAQ backend
// ---------------------------------------------------------------------------
//
// Mirrors the console backend's envelope: `{ success, data }` on success,
// `{ success: false, message }` with an error status otherwise.

type FaqStore = Arc<InMemoryCollection<Faq>>;

async fn list_faqs(State(store): State<FaqStore>) -> (StatusCode, Json<Value>) {
    match store.list().await {
        Ok(faqs) => (
            StatusCode::OK,
            Json(json!({"success": true, "count": faqs.len(), "data": faqs})),
        ),
        Err(e) => rejected(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn get_faq(State(store): State<FaqStore>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    match store.get(&id).await {
        Ok(Some(faq)) => (StatusCode::OK, Json(json!({"success": true, "data": faq}))),
        _ => rejected(StatusCode::NOT_FOUND, "FAQ not found"),
    }
}

async fn create_faq(State(store): State<FaqStore>, Json(payload): Json<Value>) -> (StatusCode, Json<Value>) {
    let has_question = payload
        .get("question")
        .and_then(Value::as_str)
        .is_some_and(|q| !q.trim().is_empty());
    if !has_question {
        return rejected(StatusCode::BAD_REQUEST, "Question is required");
    }

    match store.create(payload).await {
        Ok(Mutation::Record(faq)) => (
            StatusCode::CREATED,
            Json(json!({"success": true, "message": "FAQ created", "data": faq})),
        ),
        Ok(Mutation::Acknowledged) => (StatusCode::CREATED, Json(json!({"success": true}))),
        Err(e) => rejected(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

async fn update_faq(
    State(store): State<FaqStore>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    match store.update(&id, payload).await {
        Ok(Mutation::Record(faq)) => (StatusCode::OK, Json(json!({"success": true, "data": faq}))),
        Ok(Mutation::Acknowledged) => (StatusCode::OK, Json(json!({"success": true}))),
        Err(e) if e.error_code() == "FETCH_NOT_FOUND" => rejected(StatusCode::NOT_FOUND, "FAQ not found"),
        Err(e) => rejected(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

async fn delete_faq(State(store): State<FaqStore>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    match store.delete(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"success": true, "message": "FAQ deleted"})),
        ),
        Err(_) => rejected(StatusCode::NOT_FOUND, "FAQ not found"),
    }
}

/// Router of the FAQ endpoints over `store`
pub fn faq_router(store: FaqStore) -> Router {
    Router::new()
        .route("/api/admin/getallfaqs", get(list_faqs))
        .route("/api/admin/faq/{id}", get(get_faq))
        .route("/api/admin/createfaq", post(create_faq))
        .route("/api/admin/updatefaq/{id}", put(update_faq))
        .route("/api/admin/deletefaq/{id}", axum::routing::delete(delete_faq))
        .with_state(store)
}

/// Endpoints matching [`faq_router`]
pub fn faq_endpoints() -> CollectionEndpoints {
    CollectionEndpoints::list_only("/api/admin/getallfaqs")
        .with_get("/api/admin/faq/{id}")
        .with_create("/api/admin/createfaq")
        .with_update("/api/admin/updatefaq/{id}", UpdateMethod::Put)
        .with_delete("/api/admin/deletefaq/{id}")
}

/// A REST FAQ collection talking to a freshly spawned mock backend
pub async fn spawn_rest_faqs() -> RestCollection<Faq> {
    let (collection, _) = spawn_rest_faqs_with(InMemoryCollection::new()).await;
    collection
}

/// Like [`spawn_rest_faqs`], also returning the backing store
pub async fn spawn_rest_faqs_with(store: InMemoryCollection<Faq>) -> (RestCollection<Faq>, FaqStore) {
    let store = Arc::new(store);
    let base_url = serve(faq_router(Arc::clone(&store))).await;
    (RestCollection::new(base_url, "faqs", faq_endpoints()), store)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn faq(id: &str, question: &str, answer: &str) -> Faq {
    serde_json::from_value(json!({"_id": id, "question": question, "answer": answer})).unwrap()
}

/// Orders with known prices, users and dates
///
/// | id | user  | price | created    |
/// |----|-------|-------|------------|
/// | o1 | Alice | 50    | 2024-06-01 |
/// | o2 | Bob   | 150   | 2024-06-10 |
/// | o3 | Alice | 300   | 2024-06-15 |
/// | o4 | Carol | none  | 2024-06-20 |
/// | o5 | Bob   | 90    | none       |
pub fn orders_json() -> Value {
    let alice = json!({"_id": "u1", "name": "Alice", "email": "alice@example.com"});
    let bob = json!({"_id": "u2", "name": "Bob", "email": "bob@example.com"});
    let carol = json!({"_id": "u3", "name": "Carol", "email": "carol@example.com"});

    json!([
        {"_id": "o1", "orderId": "ORD-1", "userId": alice, "totalPrice": 50, "orderStatus": "delivered", "createdAt": "2024-06-01T08:00:00Z"},
        {"_id": "o2", "orderId": "ORD-2", "userId": bob, "totalPrice": 150, "orderStatus": "pending", "createdAt": "2024-06-10T12:00:00Z"},
        {"_id": "o3", "orderId": "ORD-3", "userId": alice, "totalPrice": "300", "orderStatus": "pending", "createdAt": "2024-06-15T23:30:00Z"},
        {"_id": "o4", "orderId": "ORD-4", "userId": carol, "orderStatus": "cancelled", "createdAt": "2024-06-20T09:00:00Z"},
        {"_id": "o5", "orderId": "ORD-5", "userId": bob, "totalPrice": 90, "orderStatus": "delivered"}
    ])
}

pub fn orders() -> Vec<Order> {
    serde_json::from_value(orders_json()).unwrap()
}

pub fn ids<T: listview::core::Record>(records: &[T]) -> Vec<&str> {
    records.iter().map(|r| r.id()).collect()
}
