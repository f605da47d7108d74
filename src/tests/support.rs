use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

pub const UPLOAD_PATH: &str = "/api/v1/documents/upload";

#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct RecordedRequest {
    pub user_id: Option<String>,
    pub content_type: Option<String>,
    pub parts: Vec<RecordedPart>,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    tx: Arc<Mutex<Option<oneshot::Sender<RecordedRequest>>>>,
}

async fn handle_upload(
    State(state): State<ServerState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(RecordedPart {
            field: name,
            file_name,
            bytes,
        });
    }

    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        user_id: header_value("x-user-id"),
        content_type: header_value(header::CONTENT_TYPE.as_str()),
        parts,
    };
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(request);
    }
    (state.status, state.body.clone())
}

/// Serves the upload route with a fixed reply and hands back the first request it sees.
pub async fn spawn_upload_server(
    status: u16,
    body: &str,
) -> std::io::Result<(String, oneshot::Receiver<RecordedRequest>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        status: StatusCode::from_u16(status).expect("valid status"),
        body: body.to_string(),
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(UPLOAD_PATH, post(handle_upload))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}{UPLOAD_PATH}"), rx))
}

/// An address nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}{UPLOAD_PATH}")
}
