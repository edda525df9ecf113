use anyhow::Context;
use itertools::Itertools;

use crate::labeler::event::PullRequestEvent;
use crate::labeler::{detect_pr_labels, LabelerContext};

/// Pull request actions after which the title or the description may have changed.
const SUPPORTED_ACTIONS: &[&str] = &["opened", "edited"];

/// Outcome of handling a pull request event, sent back as the webhook response.
#[derive(serde::Serialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResponseData {
    UnsupportedAction {
        unsupported_action: String,
    },
    PullRequest {
        pull_request: u64,
        /// Detected labels that were not present on the PR before.
        pr_labels: Vec<String>,
    },
}

/// Labels the PR from the text of its title and description.
///
/// Known labels written in brackets in the title and the `yes` answers of the description
/// table are added to the PR. Labels that are no longer detected are removed only if they
/// describe workflow state (see [`LabelerContext::is_label_removable`]).
pub(super) async fn handle_pull_request(
    ctx: &LabelerContext,
    event: PullRequestEvent,
) -> anyhow::Result<ResponseData> {
    if !SUPPORTED_ACTIONS.contains(&event.action.as_str()) {
        tracing::debug!("Ignoring unsupported action {}", event.action);
        return Ok(ResponseData::UnsupportedAction {
            unsupported_action: event.action,
        });
    }

    let repo = &event.repository;
    let pr = &event.pull_request;

    let pr_labels = detect_pr_labels(&pr.title, &pr.body, ctx.valid_labels());
    tracing::debug!("Detected labels {pr_labels:?}");

    let previous_labels = ctx
        .api
        .get_issue_labels(repo, pr.number)
        .await
        .with_context(|| format!("Cannot load labels of {repo}#{}", pr.number))?;

    let add_labels = missing_labels(&pr_labels, &previous_labels);
    if !add_labels.is_empty() {
        // All detected labels are sent, not only the missing ones.
        tracing::info!("Adding label(s) {pr_labels:?}");
        ctx.api
            .add_issue_labels(repo, pr.number, &pr_labels)
            .await
            .with_context(|| format!("Cannot add labels to {repo}#{}", pr.number))?;
    }

    for label in missing_labels(&previous_labels, &pr_labels) {
        if !ctx.is_label_removable(&label) {
            tracing::debug!("Keeping label {label}");
            continue;
        }
        tracing::info!("Removing label {label}");
        ctx.api
            .remove_issue_label(repo, pr.number, &label)
            .await
            .with_context(|| format!("Cannot remove label {label} from {repo}#{}", pr.number))?;
    }

    Ok(ResponseData::PullRequest {
        pull_request: pr.number.0,
        pr_labels: add_labels,
    })
}

/// Labels from `labels` that are not contained in `existing`, without duplicates.
fn missing_labels(labels: &[String], existing: &[String]) -> Vec<String> {
    labels
        .iter()
        .filter(|label| !existing.contains(label))
        .unique()
        .cloned()
        .collect()
}
