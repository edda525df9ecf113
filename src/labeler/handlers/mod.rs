use std::sync::Arc;

use anyhow::Context;
use tracing::Instrument;

use crate::labeler::event::LabelerEvent;
use crate::labeler::handlers::content::handle_pull_request;
use crate::labeler::LabelerContext;
use crate::utils::logging::LogError;

mod content;

pub use content::ResponseData;

/// This function executes a single labeler event.
/// Returns the data that should be sent back to GitHub, if any.
pub async fn handle_labeler_event(
    event: LabelerEvent,
    ctx: Arc<LabelerContext>,
) -> anyhow::Result<Option<ResponseData>> {
    match event {
        LabelerEvent::PullRequest(payload) => {
            let span = tracing::info_span!(
                "PullRequest",
                pr = format!("{}#{}", payload.repository, payload.pull_request.number),
                action = payload.action
            );
            match handle_pull_request(&ctx, payload)
                .instrument(span.clone())
                .await
            {
                Ok(response) => Ok(Some(response)),
                Err(error) => {
                    span.log_error(&error);
                    Err(error)
                }
            }
        }
        LabelerEvent::InstallationsChanged => {
            let span = tracing::info_span!("Installations changed");
            if let Err(error) = ctx.api.reload_repositories().instrument(span.clone()).await {
                span.log_error(&error);
                return Err(error).context("Cannot reload repositories");
            }
            Ok(None)
        }
    }
}
