use axum::{Router, http::StatusCode, routing::get};
use tokio::net::TcpListener;

async fn spawn_server(app: Router) -> (u16, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (port, handle)
}

#[tokio::test]
async fn healthcheck_succeeds_when_server_running() {
    let app = Router::new().route("/health/live", get(|| async { "live" }));
    let (port, server) = spawn_server(app).await;

    let result = review_topics::healthcheck_with_port(port).await;
    assert!(result.is_ok(), "healthcheck should succeed: {result:?}");

    server.abort();
}

#[tokio::test]
async fn healthcheck_fails_on_non_success_status() {
    let app = Router::new().route(
        "/health/live",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let (port, server) = spawn_server(app).await;

    let result = review_topics::healthcheck_with_port(port).await;
    assert!(result.is_err(), "healthcheck should fail on 503");

    server.abort();
}

#[tokio::test]
async fn healthcheck_fails_when_server_not_running() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let result = review_topics::healthcheck_with_port(port).await;
    assert!(result.is_err(), "healthcheck should fail without a server");
}
