//! Integration Tests - End-to-end Service Testing
//!
//! Boots the real axum router on an ephemeral port and exercises it
//! over the wire with reqwest, including the self-pinger loop with a
//! seeded RNG and a shutdown channel.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;

use polyglot_greeter::adapters::http::{AppState, router};
use polyglot_greeter::adapters::metrics::{MetricsRegistry, PingOutcome};
use polyglot_greeter::domain::GreetingTable;
use polyglot_greeter::usecases::SelfPinger;

/// Spawn the service on an ephemeral port.
///
/// Returns the base URL and the shared state so tests can read the
/// counters directly.
async fn spawn_app() -> (String, AppState) {
    let state = AppState {
        greetings: Arc::new(GreetingTable::with_defaults()),
        metrics: Arc::new(MetricsRegistry::new().unwrap()),
    };
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

/// Poll until `predicate` holds or the deadline passes.
async fn wait_until<F: Fn() -> bool>(predicate: F, deadline: Duration) {
    let start = tokio::time::Instant::now();
    while !predicate() {
        assert!(
            start.elapsed() < deadline,
            "condition not met within {deadline:?}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn known_languages_return_200_with_greeting() {
    let (base_url, _state) = spawn_app().await;
    let client = reqwest::Client::new();

    let cases = [
        ("en", "Hello"),
        ("es", "Hola"),
        ("de", "Hallo"),
        ("ch", "你好"),
        ("cs", "Ahoj"),
    ];

    for (code, greeting) in cases {
        let response = client
            .get(format!("{base_url}/{code}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), greeting);
    }
}

#[tokio::test]
async fn unknown_language_returns_400_with_empty_body() {
    let (base_url, _state) = spawn_app().await;
    let client = reqwest::Client::new();

    for path in ["/xx", "/unknown", "/"] {
        let response = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            reqwest::StatusCode::BAD_REQUEST,
            "path {path}"
        );
        assert_eq!(response.text().await.unwrap(), "");
    }
}

#[tokio::test]
async fn metrics_lists_both_families_before_any_traffic() {
    let (base_url, _state) = spawn_app().await;

    let response = reqwest::get(format!("{base_url}/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("app_http_requests_total"));
    assert!(body.contains("app_http_response_total"));
}

#[tokio::test]
async fn request_counter_partitions_by_status() {
    let (base_url, state) = spawn_app().await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        client.get(format!("{base_url}/en")).send().await.unwrap();
    }
    for _ in 0..2 {
        client.get(format!("{base_url}/xx")).send().await.unwrap();
    }

    assert_eq!(state.metrics.request_count("200", "get"), 3);
    assert_eq!(state.metrics.request_count("400", "get"), 2);

    // Scrapes bypass the counting layer.
    reqwest::get(format!("{base_url}/metrics")).await.unwrap();
    assert_eq!(state.metrics.request_count("200", "get"), 3);

    let body = reqwest::get(format!("{base_url}/metrics"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body
        .contains(r#"app_http_requests_total{code="200",method="get"} 3"#));
    assert!(body
        .contains(r#"app_http_requests_total{code="400",method="get"} 2"#));
}

#[tokio::test]
async fn concurrent_requests_lose_no_counter_updates() {
    let (base_url, state) = spawn_app().await;
    let client = reqwest::Client::new();

    let mut handles = Vec::with_capacity(100);
    for _ in 0..100 {
        let client = client.clone();
        let url = format!("{base_url}/en");
        handles.push(tokio::spawn(async move {
            let response = client.get(&url).send().await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(state.metrics.request_count("200", "get"), 100);
}

#[tokio::test]
async fn self_pinger_records_successes_and_stops_on_shutdown() {
    let (base_url, state) = spawn_app().await;

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let pinger = SelfPinger::new(
        base_url,
        state.greetings.languages(),
        Arc::clone(&state.metrics),
        StdRng::seed_from_u64(42),
        Duration::from_millis(5),
    );
    let handle = tokio::spawn(pinger.run(shutdown_rx));

    let metrics = Arc::clone(&state.metrics);
    wait_until(
        || metrics.ping_count(PingOutcome::Success, "200 OK") >= 3,
        Duration::from_secs(5),
    )
    .await;

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    let successes = state.metrics.ping_count(PingOutcome::Success, "200 OK");
    assert!(successes >= 3);

    // Every ping targeted a known code, so nothing may have failed.
    assert_eq!(state.metrics.ping_count(PingOutcome::Failure, ""), 0);
    assert_eq!(
        state.metrics.ping_count(PingOutcome::Failure, "400 Bad Request"),
        0
    );

    // Each successful ping was also a counted inbound request.
    assert_eq!(state.metrics.request_count("200", "get"), successes);
}

#[tokio::test]
async fn self_pinger_counts_transport_errors_as_empty_status_failures() {
    // Reserve a port, then free it so connections get refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let pinger = SelfPinger::new(
        format!("http://{addr}"),
        vec!["en".to_string()],
        Arc::clone(&metrics),
        StdRng::seed_from_u64(7),
        Duration::from_millis(5),
    );
    let handle = tokio::spawn(pinger.run(shutdown_rx));

    let probe = Arc::clone(&metrics);
    wait_until(
        || probe.ping_count(PingOutcome::Failure, "") >= 2,
        Duration::from_secs(5),
    )
    .await;

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    assert!(metrics.ping_count(PingOutcome::Failure, "") >= 2);
    assert_eq!(metrics.ping_count(PingOutcome::Success, "200 OK"), 0);
}
