// src/server/mod.rs

//! Development server.
//!
//! Serves the output root with `ServeDir`. With live reload on, HTML pages
//! get the client script injected and `/__assetpipe/reload` streams one
//! Server-Sent Event per [`ReloadSignal`](crate::reload::ReloadSignal).

use std::convert::Infallible;
use std::path::{Component, Path, PathBuf};

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::errors::{AssetpipeError, Result};
use crate::reload::ReloadHub;

pub mod inject;

pub use inject::{inject_reload_script, CLIENT_SCRIPT};

pub const RELOAD_EVENTS_PATH: &str = "/__assetpipe/reload";
pub const CLIENT_SCRIPT_PATH: &str = "/__assetpipe/client.js";

#[derive(Debug, Clone)]
pub struct ServerState {
    pub root: PathBuf,
    pub reload: ReloadHub,
}

impl ServerState {
    pub fn new(root: impl Into<PathBuf>, reload: ReloadHub) -> Self {
        Self {
            root: root.into(),
            reload,
        }
    }

    fn live_reload(&self) -> bool {
        self.reload.is_enabled()
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(CLIENT_SCRIPT_PATH, get(client_script))
        .route(RELOAD_EVENTS_PATH, get(reload_events))
        .fallback(serve_output)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `host:port` and serve until the task is dropped.
pub async fn serve(host: &str, port: u16, state: ServerState) -> Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| AssetpipeError::ServerError(format!("binding {host}:{port}: {e}")))?;
    info!(root = ?state.root, "dev server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| AssetpipeError::ServerError(e.to_string()))
}

async fn client_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        CLIENT_SCRIPT,
    )
}

async fn reload_events(State(state): State<ServerState>) -> Response {
    let Some(rx) = state.reload.subscribe() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(signal) => {
                    let event = Event::default().event("reload").data(signal.payload());
                    return Some((Ok::<Event, Infallible>(event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "reload subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

async fn serve_output(State(state): State<ServerState>, req: Request) -> Response {
    if state.live_reload() {
        if let Some(page) = html_page(&state.root, req.uri().path()).await {
            match tokio::fs::read_to_string(&page).await {
                Ok(body) => return Html(inject_reload_script(&body)).into_response(),
                Err(err) => debug!(page = ?page, error = %err, "falling back to plain file serving"),
            }
        }
    }

    match ServeDir::new(&state.root).oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

/// HTML file a request path resolves to, if any. The path is
/// percent-decoded first, the same way `ServeDir` resolves it.
///
/// Directory requests ending in `/` resolve to their `index.html`; a
/// directory without the trailing slash is left to `ServeDir`, which
/// redirects.
async fn html_page(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(uri_path).ok()?;
    let rel = decoded.trim_start_matches('/');
    let rel_path = Path::new(rel);
    if rel_path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let mut candidate = root.join(rel_path);
    if rel.is_empty() || rel.ends_with('/') {
        candidate.push("index.html");
    }

    let is_html = candidate
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
    if !is_html {
        return None;
    }

    match tokio::fs::metadata(&candidate).await {
        Ok(meta) if meta.is_file() => Some(candidate),
        _ => None,
    }
}
