use crate::github::{GithubRepoName, PullRequest};

#[derive(Debug)]
pub enum LabelerEvent {
    /// A pull request was opened, edited, closed, ...
    PullRequest(PullRequestEvent),
    /// The set of repositories accessible to the bot's GitHub App has changed.
    InstallationsChanged,
}

#[derive(Debug, Clone)]
pub struct PullRequestEvent {
    pub repository: GithubRepoName,
    /// Raw `action` field of the webhook, e.g. `opened`.
    pub action: String,
    pub pull_request: PullRequest,
}
