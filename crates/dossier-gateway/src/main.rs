//! Startup Dossier relay. Holds the model credential so the popup never sees it.
//! `GET /api/startup-info?domain=...` returns the flat dossier for a domain.

use axum::{
    body::Body,
    extract::{ConnectInfo, Query, State},
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
    routing::get,
    Json, Router,
};
use dossier_core::{
    api_key_from_env, build_prompt, normalizer, CanonicalDossier, CompletionBackend, DomainString,
    ModelError, OpenAiGateway, RelayConfig,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    backend: Arc<dyn CompletionBackend>,
}

type ApiError = (StatusCode, Json<Value>);

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[dossier-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match RelayConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to load relay config");
            std::process::exit(1);
        }
    };

    let api_key = api_key_from_env();
    if api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; /api/startup-info will answer 500 until it is");
    }

    let gateway = OpenAiGateway::new(api_key)
        .with_base_url(&config.openai_base_url)
        .with_model(&config.model);

    let state = AppState {
        backend: Arc::new(gateway),
    };
    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "bind failed");
            std::process::exit(1);
        }
    };
    tracing::info!(model = %config.model, "Backend listening on http://{}", addr);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "server exited");
    }
}

fn build_app(state: AppState) -> Router {
    // The popup runs from an extension origin; any origin may call the relay.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/startup-info", get(startup_info_handler))
        .with_state(Arc::new(state))
        .layer(axum::middleware::from_fn(log_request))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!(peer = %peer, method = %request.method(), path = %request.uri().path(), "request");
    next.run(request).await
}

async fn health() -> &'static str {
    "OK"
}

/// Prompt -> model -> parse -> flatten. Every failure is answered once, never retried.
async fn startup_info_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<CanonicalDossier>, ApiError> {
    // A repeated `domain` parameter is not an error; the first one wins.
    let domain = params
        .iter()
        .find(|(key, _)| key == "domain")
        .and_then(|(_, value)| DomainString::normalize(value))
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "domain is required" })),
            )
        })?;

    let prompt = build_prompt(&domain);
    let content = state
        .backend
        .complete(&prompt)
        .await
        .map_err(model_error_response)?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| {
        tracing::error!(domain = %domain, error = %e, raw = %content, "Failed to parse JSON from OpenAI");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to parse JSON from OpenAI response",
                "raw": content,
            })),
        )
    })?;

    let dossier = normalizer::flatten(&parsed);
    tracing::info!(
        domain = %domain,
        company = dossier.text("companyName").unwrap_or("-"),
        "dossier ready"
    );
    Ok(Json(dossier))
}

fn model_error_response(err: ModelError) -> ApiError {
    let body = match &err {
        ModelError::MissingCredential => json!({ "error": err.to_string() }),
        ModelError::Upstream { body, .. } => json!({
            "error": "OpenAI API error",
            "details": body,
        }),
        ModelError::Transport(_) | ModelError::Decode(_) => {
            tracing::error!(error = %err, "Server error");
            json!({ "error": "Internal server error" })
        }
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
}
