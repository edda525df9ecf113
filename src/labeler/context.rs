use std::sync::Arc;

use super::{LabelApi, ValidLabels};

pub struct LabelerContext {
    pub api: Arc<dyn LabelApi>,
    valid_labels: ValidLabels,
    removable_label_marker: String,
}

impl LabelerContext {
    pub fn new(
        api: Arc<dyn LabelApi>,
        valid_labels: ValidLabels,
        removable_label_marker: String,
    ) -> Self {
        Self {
            api,
            valid_labels,
            removable_label_marker,
        }
    }

    /// Labels that can be detected in a PR title.
    pub fn valid_labels(&self) -> &ValidLabels {
        &self.valid_labels
    }

    /// Can the bot remove this label when it is no longer detected on a PR?
    pub fn is_label_removable(&self, label: &str) -> bool {
        label.contains(self.removable_label_marker.as_str())
    }
}
