//! HTTP surface: the operator page and the update endpoint.
//!
//! - `GET /` serves the operator page.
//! - `GET /update?message=...` replaces the displayed message.

mod history;

pub use history::{format_entry, MessageHistory};

use crate::store::MessageStore;
use axum::{
    extract::{rejection::QueryRejection, ConnectInfo, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared state of the request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where accepted messages go.
    pub store: Arc<MessageStore>,
    /// History log, if enabled.
    pub history: Option<Arc<MessageHistory>>,
}

/// Query string of `/update`.
#[derive(Debug, Default)]
pub struct UpdateParams {
    /// New message text.
    pub message: Option<String>,
}

impl UpdateParams {
    /// Pick the parameters out of decoded query pairs.
    ///
    /// A repeated `message` keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let message = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "message").then_some(value));
        Self { message }
    }
}

/// JSON body of `/update` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UpdateResponse {
    /// The message was installed.
    Accepted {
        /// Human-readable confirmation.
        message: String,
    },
    /// The message was rejected; the display is unchanged.
    Rejected {
        /// Human-readable reason.
        error: String,
    },
}

/// Build the router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/update", get(update))
        .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "http listener started");
    }
    let app = build_app(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn update(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> (StatusCode, Json<UpdateResponse>) {
    let params = match query {
        Ok(Query(pairs)) => UpdateParams::from_pairs(pairs),
        Err(e) => {
            warn!(%peer, error = %e, "unreadable query string");
            UpdateParams::default()
        }
    };
    apply_update(state, peer, params).await
}

async fn apply_update(
    state: AppState,
    peer: SocketAddr,
    params: UpdateParams,
) -> (StatusCode, Json<UpdateResponse>) {
    let Some(text) = params.message else {
        return rejected();
    };
    if state.store.replace(&text).is_err() {
        return rejected();
    }
    info!(%peer, "message updated");

    if let Some(history) = state.history {
        let sender = peer.ip();
        let logged = tokio::task::spawn_blocking(move || history.record(sender, &text)).await;
        match logged {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "failed to write message history"),
            Err(e) => warn!(error = %e, "message history task failed"),
        }
    }

    (
        StatusCode::OK,
        Json(UpdateResponse::Accepted {
            message: "Message updated".to_string(),
        }),
    )
}

fn rejected() -> (StatusCode, Json<UpdateResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(UpdateResponse::Rejected {
            error: "No valid message provided".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn state() -> AppState {
        AppState {
            store: Arc::new(MessageStore::new("Welcome").unwrap()),
            history: None,
        }
    }

    fn peer() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40000)
    }

    async fn call(state: &AppState, message: Option<&str>) -> (StatusCode, UpdateResponse) {
        let params = UpdateParams {
            message: message.map(str::to_string),
        };
        let (status, Json(body)) = apply_update(state.clone(), peer(), params).await;
        (status, body)
    }

    #[tokio::test]
    async fn test_update_accepts_message() {
        let state = state();
        let (status, body) = call(&state, Some("Hello")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            UpdateResponse::Accepted {
                message: "Message updated".into()
            }
        );
        assert_eq!(&*state.store.snapshot().text, "Hello");
    }

    #[tokio::test]
    async fn test_update_rejects_missing_and_blank() {
        let state = state();
        for message in [None, Some(""), Some("   ")] {
            let (status, body) = call(&state, message).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(matches!(body, UpdateResponse::Rejected { .. }));
        }
        assert_eq!(&*state.store.snapshot().text, "Welcome");
    }

    #[tokio::test]
    async fn test_update_writes_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.log");
        let state = AppState {
            history: Some(Arc::new(MessageHistory::new(&path))),
            ..state()
        };

        call(&state, Some("logged")).await;
        call(&state, Some("")).await;

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.ends_with(" - 127.0.0.1 - logged\n"));
    }

    #[test]
    fn test_repeated_message_keeps_first() {
        let pairs = vec![
            ("message".to_string(), "a".to_string()),
            ("other".to_string(), "x".to_string()),
            ("message".to_string(), "b".to_string()),
        ];
        assert_eq!(UpdateParams::from_pairs(pairs).message.as_deref(), Some("a"));
        assert_eq!(UpdateParams::from_pairs(Vec::new()).message, None);
    }

    #[test]
    fn test_response_json_shape() {
        let ok = serde_json::to_string(&UpdateResponse::Accepted {
            message: "Message updated".into(),
        })
        .unwrap();
        assert_eq!(ok, r#"{"message":"Message updated"}"#);

        let err = serde_json::to_string(&UpdateResponse::Rejected {
            error: "No valid message provided".into(),
        })
        .unwrap();
        assert_eq!(err, r#"{"error":"No valid message provided"}"#);
    }

    async fn http_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_served_over_tcp() {
        let state = state();
        let store = Arc::clone(&state.store);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, state, async move {
            let _ = stop_rx.await;
        }));

        let page = http_get(addr, "/").await;
        assert!(page.starts_with("HTTP/1.1 200"));
        assert!(page.contains("DotNote"));

        let ok = http_get(addr, "/update?message=Hello%20there").await;
        assert!(ok.starts_with("HTTP/1.1 200"));
        assert!(ok.contains(r#"{"message":"Message updated"}"#));
        assert_eq!(&*store.snapshot().text, "Hello there");

        let bad = http_get(addr, "/update?message=%20").await;
        assert!(bad.starts_with("HTTP/1.1 400"));
        assert!(bad.contains(r#"{"error":"No valid message provided"}"#));
        assert_eq!(&*store.snapshot().text, "Hello there");

        let repeated = http_get(addr, "/update?message=a&message=b").await;
        assert!(repeated.starts_with("HTTP/1.1 200"));
        assert!(repeated.contains(r#"{"message":"Message updated"}"#));
        assert_eq!(&*store.snapshot().text, "a");

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
