use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Context;
use axum::async_trait;
use octocrab::models::{AppId, InstallationRepositories, Repository};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretVec};

use client::GithubRepositoryClient;

use crate::github::{GithubRepoName, PullRequestNumber};
use crate::labeler::LabelApi;

pub mod client;

type RepositoryMap = HashMap<GithubRepoName, Arc<GithubRepositoryClient>>;

/// Provides access to the repositories managed by the labeler GitHub App.
pub struct GithubAppState {
    client: Octocrab,
    repositories: RwLock<RepositoryMap>,
}

impl GithubAppState {
    /// Loads repositories managed by the GitHub app with the given ID.
    pub async fn load(app_id: AppId, private_key: SecretVec<u8>) -> anyhow::Result<GithubAppState> {
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.expose_secret().as_ref())
            .context("Could not encode private key")?;

        let client = Octocrab::builder()
            .app(app_id, key)
            .build()
            .context("Could not create octocrab builder")?;

        let repositories = load_repositories(&client).await?;
        Ok(GithubAppState {
            client,
            repositories: RwLock::new(repositories),
        })
    }

    fn get_repo(&self, repo: &GithubRepoName) -> anyhow::Result<Arc<GithubRepositoryClient>> {
        self.repositories
            .read()
            .map_err(|_| anyhow::anyhow!("Repository map lock is poisoned"))?
            .get(repo)
            .map(Arc::clone)
            .ok_or_else(|| anyhow::anyhow!("Repository {repo} not found"))
    }
}

/// Loads repositories that are connected to the given GitHub App client.
pub async fn load_repositories(client: &Octocrab) -> anyhow::Result<RepositoryMap> {
    let installations = client
        .apps()
        .installations()
        .send()
        .await
        .context("Could not load app installations")?;

    let mut repositories = HashMap::default();
    for installation in installations {
        let Some(ref repositories_url) = installation.repositories_url else {
            continue;
        };
        let installation_client = client.installation(installation.id);

        match installation_client
            .get::<InstallationRepositories, _, ()>(repositories_url, None)
            .await
        {
            Ok(repos) => {
                for repo in repos.repositories {
                    match create_repo_client(installation_client.clone(), &repo) {
                        Ok(repo_client) => {
                            tracing::info!("Loaded repository {}", repo_client.name());

                            if let Some(existing) = repositories
                                .insert(repo_client.name().clone(), Arc::new(repo_client))
                            {
                                return Err(anyhow::anyhow!(
                                    "Repository {} found in multiple installations!",
                                    existing.name()
                                ));
                            }
                        }
                        Err(error) => {
                            tracing::error!(
                                "Could not load repository {}: {error:?}",
                                repo.full_name.unwrap_or_default()
                            );
                        }
                    }
                }
            }
            Err(error) => {
                tracing::error!(
                    "Could not load repositories of installation {}: {error:?}",
                    installation.id
                );
            }
        };
    }
    Ok(repositories)
}

fn create_repo_client(
    repo_client: Octocrab,
    repo: &Repository,
) -> anyhow::Result<GithubRepositoryClient> {
    let Some(owner) = repo.owner.as_ref() else {
        return Err(anyhow::anyhow!("Repository {} has no owner", repo.name));
    };

    let name = GithubRepoName::new(&owner.login, &repo.name);
    Ok(GithubRepositoryClient::new(repo_client, name))
}

#[async_trait]
impl LabelApi for GithubAppState {
    async fn get_issue_labels(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
    ) -> anyhow::Result<Vec<String>> {
        self.get_repo(repo)?.get_labels(issue).await
    }

    async fn add_issue_labels(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
        labels: &[String],
    ) -> anyhow::Result<()> {
        self.get_repo(repo)?.add_labels(issue, labels).await
    }

    async fn remove_issue_label(
        &self,
        repo: &GithubRepoName,
        issue: PullRequestNumber,
        label: &str,
    ) -> anyhow::Result<()> {
        self.get_repo(repo)?.remove_label(issue, label).await
    }

    /// Re-download information about repositories connected to this GitHub app.
    async fn reload_repositories(&self) -> anyhow::Result<()> {
        let repositories = load_repositories(&self.client).await?;
        *self
            .repositories
            .write()
            .map_err(|_| anyhow::anyhow!("Repository map lock is poisoned"))? = repositories;
        Ok(())
    }
}
