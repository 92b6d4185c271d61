//! End-to-end tests for `GET /quote`.
//!
//! A local axum server stands in for the upstream quote API, the repository is
//! a file-backed SQLite database in a temp dir, and requests go through the
//! real router.

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use exchange_rates::AwesomeApiProvider;
use http_body_util::BodyExt;
use quotes_client::{ClientError, QuotesClient, save_bid};
use quotes_hex::{
    QuoteService, Timings,
    inbound::{CANCELLED_BODY, FETCH_FAILED_BODY, HttpServer, PERSIST_FAILED_BODY},
};
use quotes_repo::SqliteRepo;
use quotes_types::{Quote, QuoteRepository};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

const UPSTREAM_PATH: &str = "/json/last/USD-BRL";

const UPSTREAM_BODY: &str = r#"{"USDBRL":{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.05","low":"4.95","varBid":"0.01","pctChange":"0.2","bid":"5.00","ask":"5.01","timestamp":"1700000000","create_date":"2023-11-14 19:13:20"}}"#;

type TestServer = HttpServer<AwesomeApiProvider, SqliteRepo>;

/// Serves `router` on an ephemeral port and returns its base URL.
async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn healthy_upstream() -> String {
    let router = Router::new().route(UPSTREAM_PATH, get(|| async { UPSTREAM_BODY }));
    format!("{}{}", serve(router).await, UPSTREAM_PATH)
}

async fn failing_upstream() -> String {
    let router = Router::new().route(
        UPSTREAM_PATH,
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    format!("{}{}", serve(router).await, UPSTREAM_PATH)
}

fn fast_timings() -> Timings {
    Timings {
        fixed_delay: Duration::from_millis(20),
        fetch_timeout: Duration::from_millis(200),
        // Generous so a slow CI disk does not fail the happy path.
        persist_timeout: Duration::from_secs(1),
    }
}

async fn create_test_server(
    upstream_url: String,
    timings: Timings,
    request_timeout: Option<Duration>,
) -> (TestServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("exchange.db").display());
    let repo = SqliteRepo::new(&url).await.unwrap();
    let provider = AwesomeApiProvider::new(upstream_url, "USDBRL");
    let service = QuoteService::new(provider, repo).with_timings(timings);
    (HttpServer::with_request_timeout(service, request_timeout), dir)
}

fn quote_request() -> Request<Body> {
    Request::builder().uri("/quote").body(Body::empty()).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_quote_success_returns_upstream_quote() {
    let (server, _dir) = create_test_server(healthy_upstream().await, fast_timings(), None).await;

    let response = server.router().oneshot(quote_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let quote: Quote = serde_json::from_str(&body_string(response).await).unwrap();
    let expected: Quote = serde_json::from_value(
        serde_json::from_str::<serde_json::Value>(UPSTREAM_BODY).unwrap()["USDBRL"].clone(),
    )
    .unwrap();
    assert_eq!(quote, expected);

    let repo = server.service().repo();
    assert_eq!(repo.count_quotes().await.unwrap(), 1);
    assert_eq!(repo.latest_quote().await.unwrap(), Some(expected));
}

#[tokio::test]
async fn test_client_writes_bid_file() {
    let (server, _dir) = create_test_server(healthy_upstream().await, fast_timings(), None).await;
    let base = serve(server.router()).await;
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("exchange.txt");

    let bid = QuotesClient::new(base).fetch_bid().await.unwrap();
    save_bid(&path, &bid.bid).await.unwrap();

    assert_eq!(bid.bid, "5.00");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().collect::<Vec<_>>(), vec!["Dólar: 5.00"]);
}

#[tokio::test]
async fn test_request_cancelled_before_delay_returns_408() {
    let timings = Timings {
        fixed_delay: Duration::from_millis(500),
        ..fast_timings()
    };
    let (server, _dir) = create_test_server(
        healthy_upstream().await,
        timings,
        Some(Duration::from_millis(2)),
    )
    .await;

    let response = server.router().oneshot(quote_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body_string(response).await, CANCELLED_BODY);
    assert_eq!(server.service().repo().count_quotes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_client_disconnect_during_delay_records_nothing() {
    let timings = Timings {
        fixed_delay: Duration::from_millis(300),
        ..fast_timings()
    };
    let (server, _dir) = create_test_server(healthy_upstream().await, timings, None).await;
    let base = serve(server.router()).await;

    let result = QuotesClient::new(base)
        .with_timeout(Duration::from_millis(2))
        .fetch_bid()
        .await;
    assert!(matches!(result, Err(ClientError::Http(_))));

    // Well past the fixed delay: a worker that missed the disconnect would have stored a row.
    tokio::time::sleep(Duration::from_millis(800)).await;

    assert_eq!(server.service().repo().count_quotes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shutdown_cancels_waiting_requests() {
    let timings = Timings {
        fixed_delay: Duration::from_secs(5),
        ..fast_timings()
    };
    let (server, _dir) = create_test_server(healthy_upstream().await, timings, None).await;
    let token = server.shutdown_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let response = server.router().oneshot(quote_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(server.service().repo().count_quotes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upstream_failure_returns_500_without_insert() {
    let (server, _dir) = create_test_server(failing_upstream().await, fast_timings(), None).await;

    let response = server.router().oneshot(quote_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, FETCH_FAILED_BODY);
    assert_eq!(server.service().repo().count_quotes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_persist_failure_returns_500_and_server_keeps_serving() {
    let (server, _dir) = create_test_server(healthy_upstream().await, fast_timings(), None).await;
    sqlx::query("DROP TABLE exchange_rates")
        .execute(server.service().repo().pool())
        .await
        .unwrap();
    let app = server.router();

    let response = app.clone().oneshot(quote_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, PERSIST_FAILED_BODY);

    let health = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(health).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_persist_timeout_under_lock_records_nothing() {
    let timings = Timings {
        persist_timeout: Duration::from_millis(10),
        ..fast_timings()
    };
    let (server, _dir) = create_test_server(healthy_upstream().await, timings, None).await;
    let repo = server.service().repo();
    let mut writer = repo.pool().acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut *writer)
        .await
        .unwrap();

    let response = server.router().oneshot(quote_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, PERSIST_FAILED_BODY);

    sqlx::query("COMMIT").execute(&mut *writer).await.unwrap();
    drop(writer);
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(repo.count_quotes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_health() {
    let (server, _dir) = create_test_server(healthy_upstream().await, fast_timings(), None).await;
    let health = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = server.router().oneshot(health).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"status":"healthy"}"#);
}
