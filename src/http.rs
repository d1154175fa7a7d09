//! Streamable HTTP transport: axum router, bearer-token middleware for the
//! MCP path, and a permissive-by-default Host allow-list.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rmcp::transport::streamable_http_server::StreamableHttpService;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use serde::Serialize;
use serde_json::json;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::server::BailianImageServer;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Clone)]
struct AuthState {
    access_token: String,
}

#[derive(Clone)]
struct HostState {
    patterns: Vec<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?
        .trim()
        .to_string();
    let rest = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))?;
    let token = rest.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn peer_label(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Gate on the MCP path only; OPTIONS and non-tool paths pass through.
async fn require_access_token(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || !request.uri().path().starts_with("/mcp") {
        return next.run(request).await;
    }

    let authorized = bearer_token(request.headers())
        .is_some_and(|token| token == state.access_token);
    if !authorized {
        tracing::warn!("Unauthorized access from {}", peer_label(&request));
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid MCP Access Token"})),
        )
            .into_response();
    }

    next.run(request).await
}

async fn enforce_allowed_hosts(
    State(state): State<HostState>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !host_allowed(host, &state.patterns) {
        tracing::warn!("Rejected request for disallowed host {host:?}");
        return (
            StatusCode::MISDIRECTED_REQUEST,
            Json(json!({"detail": "Invalid host header"})),
        )
            .into_response();
    }
    next.run(request).await
}

/// Match a `Host` header against `host:port` patterns where `*` matches any
/// single component. `*` and `*:*` admit everything.
pub fn host_allowed(host: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| host_matches(host, pattern))
}

fn host_matches(host: &str, pattern: &str) -> bool {
    let pattern = pattern.trim();
    if pattern == "*" || pattern == "*:*" {
        return true;
    }
    let (pattern_host, pattern_port) = pattern.split_once(':').unwrap_or((pattern, "*"));
    let (host_name, host_port) = host.split_once(':').unwrap_or((host, ""));
    let host_ok = pattern_host == "*" || pattern_host.eq_ignore_ascii_case(host_name);
    let port_ok = pattern_port == "*" || pattern_port == host_port;
    host_ok && port_ok
}

/// Build the HTTP-mode router: `/health` plus the MCP service, wrapped in the
/// host filter and, when a token is configured, the bearer-auth middleware.
pub fn router(server: BailianImageServer, config: &ServerConfig) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let mut router = Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", service)
        .layer(middleware::from_fn_with_state(
            HostState {
                patterns: config.allowed_hosts.clone(),
            },
            enforce_allowed_hosts,
        ));

    match config.access_token.as_deref() {
        Some(token) => {
            tracing::info!("Enabling Bearer Auth middleware");
            router = router.layer(middleware::from_fn_with_state(
                AuthState {
                    access_token: token.to_string(),
                },
                require_access_token,
            ));
        }
        None => {
            tracing::warn!("No MCP_ACCESS_TOKEN set. Service is UNPROTECTED.");
        }
    }

    router
}

pub async fn serve(server: BailianImageServer, config: &ServerConfig, port: u16) -> Result<()> {
    let app = router(server, config);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving MCP over streamable HTTP on {addr}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;
    Ok(())
}
