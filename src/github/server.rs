use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::limit::ConcurrencyLimitLayer;

use crate::github::error::AppError;
use crate::github::webhook::{GitHubWebhook, WebhookSecret};
use crate::labeler::{handle_labeler_event, LabelerContext};

/// Shared server state for all axum handlers.
pub struct ServerState {
    ctx: Arc<LabelerContext>,
    webhook_secret: WebhookSecret,
}

impl ServerState {
    pub fn new(ctx: Arc<LabelerContext>, webhook_secret: WebhookSecret) -> Self {
        Self {
            ctx,
            webhook_secret,
        }
    }

    pub fn get_webhook_secret(&self) -> &WebhookSecret {
        &self.webhook_secret
    }
}

pub type ServerStateRef = Arc<ServerState>;

pub fn create_app(state: ServerState) -> Router {
    Router::new()
        .route("/github", post(github_webhook_handler))
        .route("/health", get(health_handler))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(Arc::new(state))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "")
}

/// Axum handler that receives a webhook, handles it and answers with the outcome.
pub async fn github_webhook_handler(
    State(state): State<ServerStateRef>,
    GitHubWebhook(event): GitHubWebhook,
) -> Result<Response, AppError> {
    let response = handle_labeler_event(event, Arc::clone(&state.ctx)).await?;
    Ok(match response {
        Some(data) => Json(data).into_response(),
        None => (StatusCode::OK, "").into_response(),
    })
}
