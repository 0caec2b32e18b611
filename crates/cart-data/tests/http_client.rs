//! HttpCatalogClient against a local axum server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use cart_core::prelude::*;
use cart_data::{
    BackoffStrategy, DependencyTag, FetchPolicy, HttpCatalogClient, RetryPolicy, TimeoutConfig,
};
use cart_store::{DurableStore, MemoryStore};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct ApiState {
    /// Number of 503s still to serve from `/stock/{id}`.
    failures: Arc<AtomicU32>,
    stock_hits: Arc<AtomicU32>,
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Tenis de Caminhada",
            "price": 179.9,
            "image": "https://img/1.jpg"
        }),
        json!({
            "id": 2,
            "title": "Tenis VR Caminhada",
            "price": 139.9,
            "image": "https://img/2.jpg"
        }),
    ]
}

async fn list_products() -> Json<Vec<Value>> {
    Json(products())
}

async fn get_product(Path(id): Path<String>) -> impl IntoResponse {
    if id == "slow" {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    match products().into_iter().find(|p| p["id"].to_string() == id) {
        Some(p) => (StatusCode::OK, Json(p)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_stock(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    let pending = state.failures.load(Ordering::SeqCst);
    if pending > 0 {
        state.failures.store(pending - 1, Ordering::SeqCst);
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    match id.as_str() {
        "1" => Json(json!({"id": 1, "amount": 3})).into_response(),
        "2" => Json(json!({"id": 2, "amount": 1})).into_response(),
        "bad" => (StatusCode::OK, "not json").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve(state: ApiState) -> String {
    let app = Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/stock/{id}", get(get_stock))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn fast_policy(retries: u32) -> FetchPolicy {
    FetchPolicy::new(
        TimeoutConfig::from_total(Duration::from_millis(200)),
        RetryPolicy::new(retries).with_backoff(BackoffStrategy::None),
    )
}

#[tokio::test]
async fn test_get_product_converts_price() {
    let base = serve(ApiState::default()).await;
    let client = HttpCatalogClient::new(&base, Currency::BRL).unwrap();

    let product = client.get_product(&ProductId::from(1u64)).await.unwrap();

    assert_eq!(product.id, ProductId::from("1"));
    assert_eq!(product.title, "Tenis de Caminhada");
    assert_eq!(product.price, Money::new(17990, Currency::BRL));
    assert_eq!(product.image, "https://img/1.jpg");
}

#[tokio::test]
async fn test_get_stock() {
    let base = serve(ApiState::default()).await;
    let client = HttpCatalogClient::new(&base, Currency::BRL).unwrap();

    let stock = client.get_stock(&ProductId::from(2u64)).await.unwrap();
    assert_eq!(stock, Stock::new(1));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let base = serve(ApiState::default()).await;
    let client = HttpCatalogClient::new(&base, Currency::BRL).unwrap();

    let err = client.get_product(&ProductId::from(99u64)).await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound(_)));
}

#[tokio::test]
async fn test_list_products() {
    let base = serve(ApiState::default()).await;
    let client = HttpCatalogClient::new(&base, Currency::BRL).unwrap();

    let products = client.list_products().await.unwrap();
    let ids: Vec<_> = products.iter().map(|p| p.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(products[1].price, Money::new(13990, Currency::BRL));
}

#[tokio::test]
async fn test_stock_retries_server_errors() {
    let state = ApiState::default();
    state.failures.store(2, Ordering::SeqCst);
    let base = serve(state.clone()).await;
    let client =
        HttpCatalogClient::with_policies(&base, Currency::BRL, fast_policy(0), fast_policy(2))
            .unwrap();

    let stock = client.get_stock(&ProductId::from(1u64)).await.unwrap();

    assert_eq!(stock.amount, 3);
    assert_eq!(state.stock_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_budget_exhausted() {
    let state = ApiState::default();
    state.failures.store(5, Ordering::SeqCst);
    let base = serve(state.clone()).await;
    let client =
        HttpCatalogClient::with_policies(&base, Currency::BRL, fast_policy(0), fast_policy(1))
            .unwrap();

    let err = client.get_stock(&ProductId::from(1u64)).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Http {
            status: 503,
            url: format!("{base}/stock/1"),
        }
    );
    assert_eq!(state.stock_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_malformed_body() {
    let base = serve(ApiState::default()).await;
    let client = HttpCatalogClient::new(&base, Currency::BRL).unwrap();

    let err = client.get_stock(&ProductId::from("bad")).await.unwrap_err();
    assert!(matches!(err, FetchError::Deserialization(_)));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let base = serve(ApiState::default()).await;
    let client = HttpCatalogClient::with_policies(
        &base,
        Currency::BRL,
        FetchPolicy::new(
            TimeoutConfig::from_total(Duration::from_millis(50)),
            RetryPolicy::none(),
        ),
        FetchPolicy::from_tag(DependencyTag::Inventory),
    )
    .unwrap();

    let err = client.get_product(&ProductId::from("slow")).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpCatalogClient::with_policies(
        &format!("http://{addr}"),
        Currency::BRL,
        fast_policy(0),
        fast_policy(0),
    )
    .unwrap();

    let err = client.get_stock(&ProductId::from(1u64)).await.unwrap_err();
    assert!(matches!(err, FetchError::Connection(_)));
}

#[tokio::test]
async fn test_machine_over_http() {
    let base = serve(ApiState::default()).await;
    let client = Arc::new(HttpCatalogClient::new(&base, Currency::BRL).unwrap());
    let store = Arc::new(MemoryStore::new());
    let config = CartConfig::default().with_currency(Currency::BRL);
    let machine = CartMachine::load(store.clone(), client.clone(), client, config).unwrap();
    let id = ProductId::from(2u64);

    machine.add_product(&id).await.unwrap();
    let err = machine.add_product(&id).await.unwrap_err();

    assert!(err.is_out_of_stock());
    assert_eq!(machine.snapshot().get(&id).unwrap().amount, 1);
    assert_eq!(machine.total(), Some(Money::new(13990, Currency::BRL)));
    assert_eq!(
        store.read("cart:v1").unwrap().unwrap(),
        machine.snapshot().to_json().unwrap()
    );
}
