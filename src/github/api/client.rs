use anyhow::Context;
use octocrab::{Error, Octocrab};

use crate::github::{GithubRepoName, PullRequestNumber};

/// Provides access to a single app installation (repository) using the GitHub API.
pub struct GithubRepositoryClient {
    /// The client caches the access token for this given repository and refreshes it once it
    /// expires.
    client: Octocrab,
    repo_name: GithubRepoName,
}

impl GithubRepositoryClient {
    pub fn new(client: Octocrab, repo_name: GithubRepoName) -> Self {
        Self { client, repo_name }
    }

    pub fn name(&self) -> &GithubRepoName {
        &self.repo_name
    }

    fn format_pr(&self, pr: PullRequestNumber) -> String {
        format!("{}/{}/{}", self.name().owner(), self.name().name(), pr)
    }

    /// Names of all labels of the given issue or pull request.
    pub async fn get_labels(&self, pr: PullRequestNumber) -> anyhow::Result<Vec<String>> {
        let page = self
            .client
            .issues(self.name().owner(), self.name().name())
            .list_labels_for_issue(pr.0)
            .per_page(100)
            .send()
            .await
            .with_context(|| format!("Cannot list labels of {}", self.format_pr(pr)))?;
        let labels = self
            .client
            .all_pages(page)
            .await
            .with_context(|| format!("Cannot list labels of {}", self.format_pr(pr)))?;
        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    pub async fn add_labels(&self, pr: PullRequestNumber, labels: &[String]) -> anyhow::Result<()> {
        if !labels.is_empty() {
            self.client
                .issues(self.name().owner(), self.name().name())
                .add_labels(pr.0, labels)
                .await
                .with_context(|| format!("Cannot add label(s) to {}", self.format_pr(pr)))?;
        }
        Ok(())
    }

    pub async fn remove_label(&self, pr: PullRequestNumber, label: &str) -> anyhow::Result<()> {
        match self
            .client
            .issues(self.name().owner(), self.name().name())
            .remove_label(pr.0, label)
            .await
        {
            Ok(_) => Ok(()),
            // This error is returned if we try to remove a label that does not exist on the issue.
            // This should be a no-op, rather than an error, therefore we swallow this error.
            Err(Error::GitHub { source, .. }) if source.message.contains("Label does not exist") => {
                tracing::trace!("Trying to remove label {label} which does not exist on PR {pr}");
                Ok(())
            }
            Err(error) => Err(anyhow::Error::new(error)).with_context(|| {
                format!("Cannot remove label {label} from {}", self.format_pr(pr))
            }),
        }
    }
}
