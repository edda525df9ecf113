use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::async_trait;
use derive_builder::Builder;

use crate::config::DEFAULT_REMOVABLE_LABEL_MARKER;
use crate::github::{GithubRepoName, PullRequestNumber};
use crate::labeler::event::{LabelerEvent, PullRequestEvent};
use crate::labeler::{handle_labeler_event, LabelApi, LabelerContext, ResponseData, ValidLabels};

type GetLabelsFn = Box<dyn Fn(PullRequestNumber) -> anyhow::Result<Vec<String>> + Send + Sync>;

/// Label API that keeps labels in memory and records every modification.
pub struct TestLabelApi {
    labels: Arc<Mutex<HashMap<u64, Vec<String>>>>,
    get_labels_fn: Mutex<GetLabelsFn>,
    added_labels: Mutex<HashMap<u64, Vec<String>>>,
    removed_labels: Mutex<HashMap<u64, Vec<String>>>,
    call_count: Mutex<usize>,
    reload_count: Mutex<usize>,
    fail_reload: Mutex<bool>,
}

impl TestLabelApi {
    pub fn new(labels: HashMap<u64, Vec<String>>) -> Self {
        let labels = Arc::new(Mutex::new(labels));
        let stored = Arc::clone(&labels);
        Self {
            labels,
            get_labels_fn: Mutex::new(Box::new(move |pr| {
                Ok(stored
                    .lock()
                    .unwrap()
                    .get(&pr.0)
                    .cloned()
                    .unwrap_or_default())
            })),
            added_labels: Default::default(),
            removed_labels: Default::default(),
            call_count: Default::default(),
            reload_count: Default::default(),
            fail_reload: Default::default(),
        }
    }

    // Getters
    pub fn reload_count(&self) -> usize {
        *self.reload_count.lock().unwrap()
    }

    // Setters
    pub fn set_labels(&self, pr: u64, labels: &[&str]) {
        self.labels
            .lock()
            .unwrap()
            .insert(pr, labels.iter().map(|l| l.to_string()).collect());
    }

    pub fn set_get_labels_fn<
        F: Fn(PullRequestNumber) -> anyhow::Result<Vec<String>> + Send + Sync + 'static,
    >(
        &self,
        f: F,
    ) {
        *self.get_labels_fn.lock().unwrap() = Box::new(f);
    }

    pub fn fail_reload(&self) {
        *self.fail_reload.lock().unwrap() = true;
    }

    // Checks
    pub fn check_labels(&self, pr: u64, labels: &[&str]) -> &Self {
        assert_eq!(
            self.labels
                .lock()
                .unwrap()
                .get(&pr)
                .cloned()
                .unwrap_or_default(),
            labels
        );
        self
    }

    pub fn check_added_labels(&self, pr: u64, added: &[&str]) -> &Self {
        assert_eq!(
            self.added_labels
                .lock()
                .unwrap()
                .get(&pr)
                .cloned()
                .unwrap_or_default(),
            added
        );
        self
    }

    pub fn check_removed_labels(&self, pr: u64, removed: &[&str]) -> &Self {
        assert_eq!(
            self.removed_labels
                .lock()
                .unwrap()
                .get(&pr)
                .cloned()
                .unwrap_or_default(),
            removed
        );
        self
    }

    /// Checks how many label API calls (get, add or remove) were performed.
    pub fn check_call_count(&self, count: usize) -> &Self {
        assert_eq!(*self.call_count.lock().unwrap(), count);
        self
    }

    fn record_call(&self) {
        *self.call_count.lock().unwrap() += 1;
    }
}

#[async_trait]
impl LabelApi for TestLabelApi {
    async fn get_issue_labels(
        &self,
        _repo: &GithubRepoName,
        issue: PullRequestNumber,
    ) -> anyhow::Result<Vec<String>> {
        self.record_call();
        (self.get_labels_fn.lock().unwrap())(issue)
    }

    async fn add_issue_labels(
        &self,
        _repo: &GithubRepoName,
        issue: PullRequestNumber,
        labels: &[String],
    ) -> anyhow::Result<()> {
        self.record_call();
        self.added_labels
            .lock()
            .unwrap()
            .entry(issue.0)
            .or_default()
            .extend(labels.to_vec());

        let mut all_labels = self.labels.lock().unwrap();
        let stored = all_labels.entry(issue.0).or_default();
        for label in labels {
            if !stored.contains(label) {
                stored.push(label.clone());
            }
        }
        Ok(())
    }

    async fn remove_issue_label(
        &self,
        _repo: &GithubRepoName,
        issue: PullRequestNumber,
        label: &str,
    ) -> anyhow::Result<()> {
        self.record_call();
        self.removed_labels
            .lock()
            .unwrap()
            .entry(issue.0)
            .or_default()
            .push(label.to_string());
        if let Some(stored) = self.labels.lock().unwrap().get_mut(&issue.0) {
            stored.retain(|l| l != label);
        }
        Ok(())
    }

    async fn reload_repositories(&self) -> anyhow::Result<()> {
        if *self.fail_reload.lock().unwrap() {
            return Err(anyhow::anyhow!("Cannot load app installations"));
        }
        *self.reload_count.lock().unwrap() += 1;
        Ok(())
    }
}

/// Runs labeler events against a [`TestLabelApi`].
pub struct LabelerTester {
    api: Arc<TestLabelApi>,
    ctx: Arc<LabelerContext>,
}

impl LabelerTester {
    pub fn api(&self) -> &TestLabelApi {
        &self.api
    }

    pub fn context(&self) -> Arc<LabelerContext> {
        Arc::clone(&self.ctx)
    }

    pub async fn try_event(&self, event: LabelerEvent) -> anyhow::Result<Option<ResponseData>> {
        handle_labeler_event(event, Arc::clone(&self.ctx)).await
    }

    /// Execute an event.
    pub async fn event(&self, event: LabelerEvent) -> Option<ResponseData> {
        self.try_event(event).await.unwrap()
    }

    pub async fn pull_request<T: Into<PullRequestEvent>>(&self, event: T) -> ResponseData {
        self.event(LabelerEvent::PullRequest(event.into()))
            .await
            .expect("Pull request event should produce a response")
    }
}

impl Default for LabelerTester {
    fn default() -> Self {
        LabelerTesterBuilder::default().create()
    }
}

#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct LabelerTesterConfig {
    #[builder(default)]
    valid_labels: ValidLabels,
    #[builder(default = "DEFAULT_REMOVABLE_LABEL_MARKER.to_string()")]
    removable_label_marker: String,
    #[builder(field(ty = "HashMap<u64, Vec<String>>"))]
    labels: HashMap<u64, Vec<String>>,
}

impl LabelerTesterConfigBuilder {
    /// Labels present on the given PR before the event arrives.
    pub fn pr_labels(mut self, pr: u64, labels: &[&str]) -> Self {
        self.labels
            .insert(pr, labels.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn create(self) -> LabelerTester {
        let LabelerTesterConfig {
            valid_labels,
            removable_label_marker,
            labels,
        } = self.build().unwrap();
        let api = Arc::new(TestLabelApi::new(labels));
        let ctx = LabelerContext::new(
            Arc::clone(&api) as Arc<dyn LabelApi>,
            valid_labels,
            removable_label_marker,
        );
        LabelerTester {
            api,
            ctx: Arc::new(ctx),
        }
    }
}

pub type LabelerTesterBuilder = LabelerTesterConfigBuilder;
