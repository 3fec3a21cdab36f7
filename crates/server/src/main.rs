use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::protocol::{LookupByEmailRequest, SaveCredentialsRequest};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};

mod config;
mod error;
mod service;

use config::{load_settings, normalize_database_url};
use error::AppResult;

#[derive(Clone)]
struct AppState {
    storage: Storage,
}

const MAX_BODY_BYTES: usize = 16 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    storage.health_check().await?;

    let app = build_router(Arc::new(AppState { storage }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "credentials backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/crud/save_credentials", post(save_credentials_handler))
        .route("/crud/get_by_email", post(get_by_email_handler))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[axum::debug_handler]
async fn save_credentials_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveCredentialsRequest>,
) -> AppResult<impl IntoResponse> {
    let summary = service::save_credentials(&state.storage, &body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[axum::debug_handler]
async fn get_by_email_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LookupByEmailRequest>,
) -> AppResult<impl IntoResponse> {
    let summary = service::lookup_by_email(&state.storage, &body.email).await?;
    Ok((StatusCode::OK, Json(summary)))
}
