//! Detection of labels from the text of a pull request.
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Bracketed segments of a title, e.g. `[Routing]`. One segment per bracket pair.
static TITLE_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?P<label>.+?)\]").expect("Invalid title label regex"));

/// Rows of the PR description table and the label that a `yes` answer implies.
/// Only ASCII whitespace may pad the cells.
static BODY_FLAGS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\|(?-u:\s)*Bug fix\?(?-u:\s)*\|(?-u:\s)*yes(?-u:\s)*", "Bug"),
        (r"\|(?-u:\s)*New feature\?(?-u:\s)*\|(?-u:\s)*yes(?-u:\s)*", "Feature"),
        (r"\|(?-u:\s)*BC breaks\?(?-u:\s)*\|(?-u:\s)*yes(?-u:\s)*", "BC Break"),
        (r"\|(?-u:\s)*Deprecations\?(?-u:\s)*\|(?-u:\s)*yes(?-u:\s)*", "Deprecation"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("Invalid body flag regex"), label))
    .collect()
});

const DEFAULT_VALID_LABELS: &[&str] = &[
    "Asset",
    "BC Break",
    "BrowserKit",
    "Bug",
    "Cache",
    "ClassLoader",
    "Config",
    "Console",
    "Critical",
    "CssSelector",
    "Debug",
    "DebugBundle",
    "DependencyInjection",
    "Deprecation",
    "Doctrine",
    "DoctrineBridge",
    "DomCrawler",
    "Drupal related",
    "DX",
    "Easy Pick",
    "Enhancement",
    "EventDispatcher",
    "ExpressionLanguage",
    "Feature",
    "Filesystem",
    "Finder",
    "Form",
    "FrameworkBundle",
    "HttpFoundation",
    "HttpKernel",
    "Intl",
    "Ldap",
    "Locale",
    "MonologBridge",
    "OptionsResolver",
    "PhpUnitBridge",
    "Process",
    "PropertyAccess",
    "PropertyInfo",
    "Ready",
    "RFC",
    "Routing",
    "Security",
    "SecurityBundle",
    "Serializer",
    "Stopwatch",
    "Templating",
    "Translator",
    "TwigBridge",
    "TwigBundle",
    "Unconfirmed",
    "Validator",
    "VarDumper",
    "WebProfilerBundle",
    "Yaml",
];

/// Labels that may be picked up from a pull request title.
/// Built once at startup and never modified afterwards.
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidLabels(HashSet<String>);

impl ValidLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ValidLabels {
    fn default() -> Self {
        Self::new(DEFAULT_VALID_LABELS.iter().copied())
    }
}

/// Returns the known labels written in brackets in the title, in the order in which they
/// appear. Duplicates are kept.
///
/// For example `[PropertyAccess] [RFC] [WIP] Allow custom methods` yields
/// `["PropertyAccess", "RFC"]`, because `WIP` is not a known label.
pub fn extract_title_labels(title: &str, valid_labels: &ValidLabels) -> Vec<String> {
    TITLE_LABEL_REGEX
        .captures_iter(title)
        .filter_map(|captures| captures.name("label"))
        .map(|label| label.as_str())
        .filter(|label| valid_labels.contains(label))
        .map(ToString::to_string)
        .collect()
}

/// Returns the labels implied by the `yes` answers of the PR description table.
pub fn extract_body_flags(body: &str) -> Vec<String> {
    BODY_FLAGS
        .iter()
        .filter(|(regex, _)| regex.is_match(body))
        .map(|(_, label)| label.to_string())
        .collect()
}

/// Title labels followed by body flags. This is a concatenation, so a label detected both
/// in the title and in the body appears twice.
pub fn detect_pr_labels(title: &str, body: &str, valid_labels: &ValidLabels) -> Vec<String> {
    let mut labels = extract_title_labels(title, valid_labels);
    labels.extend(extract_body_flags(body));
    labels
}
