use std::net::SocketAddr;

use container_healthcheck::models::error::ProbeError;
use container_healthcheck::{ProbeConfig, ProbeExecutor, StatusPolicy};
use warp::http::StatusCode;
use warp::Filter;

// Local endpoints standing in for the probed container service.
async fn spawn_server() -> SocketAddr {
    let health = warp::path("health").map(|| "ok");
    let broken = warp::path("broken")
        .map(|| warp::reply::with_status("unavailable", StatusCode::SERVICE_UNAVAILABLE));
    let created =
        warp::path("created").map(|| warp::reply::with_status("made", StatusCode::CREATED));
    let moved = warp::path("moved").map(|| {
        warp::reply::with_header(
            warp::reply::with_status("", StatusCode::FOUND),
            "location",
            "/health",
        )
    });
    let routes = health.or(broken).or(created).or(moved);

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn strict_config(url: &str, expect: u16) -> ProbeConfig {
    ProbeConfig::from_args(url, "GET", expect, false, None).unwrap()
}

// Reserve a port, then free it so connections to it are refused.
fn refused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn matching_status_reports_success() {
    let addr = spawn_server().await;
    let config = strict_config(&format!("http://{}/health", addr), 200);
    let executor = ProbeExecutor::new(config);

    let report = executor.execute().await.unwrap();
    assert!(report.matched);
    assert_eq!(report.host, "127.0.0.1");
    assert_eq!(report.status_line, "200 OK");
    assert_eq!(report.body_bytes, 2);
    assert_eq!(
        report.render(StatusPolicy::Exact(200)),
        "SUCCESS, 127.0.0.1: 200 OK, 2 bytes"
    );
}

#[tokio::test]
async fn mismatched_status_reports_failure_with_actual_status() {
    let addr = spawn_server().await;
    let config = strict_config(&format!("http://{}/broken", addr), 200);
    let executor = ProbeExecutor::new(config);

    let report = executor.execute().await.unwrap();
    assert!(!report.matched);
    assert_eq!(report.status_line, "503 Service Unavailable");
    assert_eq!(report.body_bytes, "unavailable".len());

    let line = report.render(StatusPolicy::Exact(200));
    assert!(line.starts_with("FAILURE, "));
    assert!(line.contains("503"));
}

#[tokio::test]
async fn redirects_are_never_followed() {
    let addr = spawn_server().await;

    // The first response is what gets reported, not the hop target.
    let config = strict_config(&format!("http://{}/moved", addr), 302);
    let report = ProbeExecutor::new(config).execute().await.unwrap();
    assert!(report.matched);
    assert_eq!(report.status_line, "302 Found");

    // Expecting the hop target's 200 must fail.
    let config = strict_config(&format!("http://{}/moved", addr), 200);
    let report = ProbeExecutor::new(config).execute().await.unwrap();
    assert!(!report.matched);
}

#[tokio::test]
async fn legacy_mode_accepts_any_2xx() {
    let addr = spawn_server().await;

    let config =
        ProbeConfig::from_args(&format!("http://{}/created", addr), "GET", 200, true, None)
            .unwrap();
    let report = ProbeExecutor::new(config).execute().await.unwrap();
    assert!(report.matched);
    assert_eq!(report.status_line, "201 Created");
    // Legacy report carries no tag.
    assert_eq!(
        report.render(StatusPolicy::SuccessRange),
        "127.0.0.1: 201 Created, 4 bytes"
    );

    let config =
        ProbeConfig::from_args(&format!("http://{}/broken", addr), "GET", 200, true, None)
            .unwrap();
    let report = ProbeExecutor::new(config).execute().await.unwrap();
    assert!(!report.matched);
}

#[tokio::test]
async fn head_request_succeeds_with_empty_body() {
    let addr = spawn_server().await;
    let config =
        ProbeConfig::from_args(&format!("http://{}/health", addr), "head", 200, false, None)
            .unwrap();

    let report = ProbeExecutor::new(config).execute().await.unwrap();
    assert!(report.matched);
    assert_eq!(report.body_bytes, 0);
}

#[tokio::test]
async fn connection_refused_is_a_terminal_transport_error() {
    let config = strict_config(&format!("http://127.0.0.1:{}/health", refused_port()), 200);
    let err = ProbeExecutor::new(config).execute().await.unwrap_err();
    assert!(matches!(err, ProbeError::TransportError(_)), "got {}", err);
}

#[tokio::test]
async fn unreachable_proxy_is_a_terminal_transport_error() {
    let addr = spawn_server().await;
    let proxy = format!("127.0.0.1:{}", refused_port());
    let config = ProbeConfig::from_args(
        &format!("http://{}/health", addr),
        "GET",
        200,
        false,
        Some(&proxy),
    )
    .unwrap();

    let err = ProbeExecutor::new(config).execute().await.unwrap_err();
    assert!(matches!(err, ProbeError::TransportError(_)), "got {}", err);
}
