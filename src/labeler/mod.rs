use std::sync::Arc;

use axum::async_trait;

use crate::config::LabelerConfig;
use crate::github::{GithubRepoName, PullRequestNumber};

mod context;
pub mod event;
mod handlers;
mod labels;

pub use context::LabelerContext;
pub use handlers::{handle_labeler_event, ResponseData};
pub use labels::{detect_pr_labels, extract_body_flags, extract_title_labels, ValidLabels};

/// Provides access to the labels of issues and pull requests.
/// It is behind a trait to allow easier mocking in tests.
#[async_trait]
pub trait LabelApi: Send + Sync {
    /// Return the names of all labels currently attached to the given issue.
    async fn get_issue_labels(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
    ) -> anyhow::Result<Vec<String>>;

    /// Add a set of labels to an issue.
    async fn add_issue_labels(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
        labels: &[String],
    ) -> anyhow::Result<()>;

    /// Remove a single label from an issue.
    async fn remove_issue_label(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
        label: &str,
    ) -> anyhow::Result<()>;

    /// Reload the set of repositories the API can access due to some external change.
    async fn reload_repositories(&self) -> anyhow::Result<()>;
}

/// Creates the shared context from a label API and the loaded configuration.
pub fn create_context(api: Arc<dyn LabelApi>, config: LabelerConfig) -> LabelerContext {
    LabelerContext::new(api, config.valid_labels, config.removable_label_marker)
}
