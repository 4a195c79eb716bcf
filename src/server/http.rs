//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo; one task per accepted connection.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Args;
use crate::db::DocumentStore;
use crate::routes;
use crate::server::cors::CorsRequest;
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Database handle, created once at startup; `None` in degraded mode
    pub store: Option<Arc<dyn DocumentStore>>,
}

impl AppState {
    pub fn new(args: Args, store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { args, store }
    }
}

/// Bind the configured address and serve until `shutdown` resolves
pub async fn run(state: Arc<AppState>, shutdown: impl Future<Output = ()>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen_addr()).await?;
    serve(listener, state, shutdown).await
}

/// Serve connections from an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    info!("Tileboard listening on {}", listener.local_addr()?);

    if state.store.is_none() {
        warn!("No database configured - leaderboard endpoints will return errors");
    }

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            async move {
                                info!("[{}] {} {}", addr, req.method(), req.uri().path());
                                Ok::<_, Infallible>(handle_request(state, req).await)
                            }
                        });

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            error!("Error serving connection from {}: {:?}", addr, err);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    Ok(())
}

/// Route a request and attach CORS headers to the response
pub async fn handle_request<B>(state: Arc<AppState>, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let cors = CorsRequest::from_headers(req.headers());
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = match (&method, path.as_str()) {
        (&Method::OPTIONS, _) if cors.is_preflight() => return cors.preflight(),

        (&Method::GET, "/") => routes::root(),
        (&Method::GET, "/test") => routes::diagnostics(state).await,
        (&Method::GET, "/api/leaderboard") => routes::handle_list_scores(state).await,
        (&Method::POST, "/api/leaderboard") => routes::handle_submit_score(req, state).await,

        (_, "/") | (_, "/test") | (_, "/api/leaderboard") => routes::method_not_allowed_response(),
        _ => routes::not_found_response(),
    };

    debug!("{} {} -> {}", method, path, response.status());
    cors.apply(&mut response);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_args;
    use crate::db::MemoryStore;
    use crate::testing::FailingStore;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use serde_json::{json, Value};

    fn memory_state() -> Arc<AppState> {
        Arc::new(AppState::new(test_args(), Some(Arc::new(MemoryStore::new()))))
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn call(state: &Arc<AppState>, req: Request<Full<Bytes>>) -> (StatusCode, Value) {
        let response = handle_request(Arc::clone(state), req).await;
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn submit(state: &Arc<AppState>, score: Value) -> (StatusCode, Value) {
        call(
            state,
            request(Method::POST, "/api/leaderboard", &score.to_string()),
        )
        .await
    }

    async fn leaderboard(state: &Arc<AppState>) -> Vec<Value> {
        let (status, body) = call(state, request(Method::GET, "/api/leaderboard", "")).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().unwrap().clone()
    }

    #[tokio::test]
    async fn test_root() {
        let state = memory_state();
        let (status, body) = call(&state, request(Method::GET, "/", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Matching Tiles API running"}));
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let state = memory_state();
        let (status, created) =
            submit(&state, json!({"name": "Ann", "time_ms": 1200, "moves": 30})).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let entries = leaderboard(&state).await;
        assert_eq!(
            entries,
            vec![json!({"id": id, "name": "Ann", "time_ms": 1200, "moves": 30})]
        );
    }

    #[tokio::test]
    async fn test_ordering_by_time_then_moves() {
        let state = memory_state();
        submit(&state, json!({"name": "slow", "time_ms": 3000, "moves": 5})).await;
        submit(&state, json!({"name": "fast-many", "time_ms": 1000, "moves": 50})).await;
        submit(&state, json!({"name": "fast-few", "time_ms": 1000, "moves": 10})).await;

        let names: Vec<String> = leaderboard(&state)
            .await
            .iter()
            .map(|e| e["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["fast-few", "fast-many", "slow"]);
    }

    #[tokio::test]
    async fn test_leaderboard_capped_at_twenty() {
        let state = memory_state();
        for i in 0..25 {
            let (status, _) =
                submit(&state, json!({"name": format!("p{}", i), "time_ms": 1000 + i, "moves": 1}))
                    .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        assert_eq!(leaderboard(&state).await.len(), 20);
    }

    #[tokio::test]
    async fn test_duplicate_scores_both_persist() {
        let state = memory_state();
        let score = json!({"name": "Bo", "time_ms": 900, "moves": 12});
        let (_, first) = submit(&state, score.clone()).await;
        let (_, second) = submit(&state, score).await;

        assert_ne!(first["id"], second["id"]);
        assert_eq!(leaderboard(&state).await.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_422() {
        let state = memory_state();
        let (status, body) = submit(&state, json!({"time_ms": "fast", "moves": 30})).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body["detail"].as_array().unwrap();
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0]["loc"], json!(["body", "name"]));
        assert_eq!(detail[1]["loc"], json!(["body", "time_ms"]));

        // Nothing was stored
        assert!(leaderboard(&state).await.is_empty());
    }

    #[tokio::test]
    async fn test_numeric_strings_stored_as_integers() {
        let state = memory_state();
        let (status, _) = submit(
            &state,
            json!({"name": "Ann", "time_ms": "1200", "moves": 30.0}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let entries = leaderboard(&state).await;
        assert_eq!(entries[0]["time_ms"], json!(1200));
        assert_eq!(entries[0]["moves"], json!(30));
    }

    #[tokio::test]
    async fn test_invalid_payload_is_422_without_database() {
        let state = Arc::new(AppState::new(test_args(), None));
        let (status, _) = call(&state, request(Method::POST, "/api/leaderboard", "nope")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unreachable_database() {
        let state = Arc::new(AppState::new(test_args(), Some(Arc::new(FailingStore))));

        let (status, body) = call(&state, request(Method::GET, "/api/leaderboard", "")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("Find failed"));
        assert!(detail.chars().count() <= routes::response::ERROR_DETAIL_MAX_CHARS);

        let (status, _) =
            submit(&state, json!({"name": "Ann", "time_ms": 1200, "moves": 30})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = call(&state, request(Method::GET, "/test", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["database"]
            .as_str()
            .unwrap()
            .starts_with("⚠️  Connected but Error"));
    }

    #[tokio::test]
    async fn test_degraded_mode() {
        let state = Arc::new(AppState::new(test_args(), None));

        let (status, body) = call(&state, request(Method::GET, "/api/leaderboard", "")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("DATABASE_URL"));

        let (status, _) =
            submit(&state, json!({"name": "Ann", "time_ms": 1200, "moves": 30})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = call(&state, request(Method::GET, "/test", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connection_status"], "Not Connected");
        assert_eq!(body["backend"], "✅ Running");
    }

    #[tokio::test]
    async fn test_fallbacks() {
        let state = memory_state();
        let (status, body) = call(&state, request(Method::GET, "/nope", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Not Found"}));

        let (status, _) = call(&state, request(Method::DELETE, "/api/leaderboard", "")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_plain_options_is_routed() {
        let state = memory_state();

        let (status, body) =
            call(&state, request(Method::OPTIONS, "/api/leaderboard", "")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"detail": "Method Not Allowed"}));

        let (status, _) = call(&state, request(Method::OPTIONS, "/nope", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Origin alone does not make a preflight
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/leaderboard")
            .header("origin", "https://tiles.example")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handle_request(state, req).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://tiles.example"
        );
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let state = memory_state();

        let req = Request::builder()
            .method(Method::GET)
            .uri("/api/leaderboard")
            .header("origin", "https://tiles.example")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handle_request(Arc::clone(&state), req).await;
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://tiles.example"
        );
        assert_eq!(response.headers()["access-control-allow-credentials"], "true");

        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/leaderboard")
            .header("origin", "https://tiles.example")
            .header("access-control-request-method", "POST")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handle_request(state, preflight).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("POST"));
    }

    #[tokio::test]
    async fn test_serve_over_tcp() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpStream;
        use tokio::sync::oneshot;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, memory_state(), async move {
            let _ = stop_rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();

        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        assert!(raw.contains("Matching Tiles API running"));

        stop_tx.send(()).unwrap();
        tokio_test::assert_ok!(server.await.unwrap());
    }
}
