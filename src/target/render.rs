//! Rendering of the target collection into scrape-config YAML.
//!
//! The scrape-job block shape — field names, relabeling rules, the `|`
//! delimiter in synthetic addresses — is a compatibility contract with the
//! downstream scraping system and is reproduced exactly.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::BuildError;
use crate::target::{TargetCollection, TargetEntry};

/// Global scrape defaults emitted by full rendering.
const GLOBAL_SCRAPE_INTERVAL: &str = "15s";
const GLOBAL_EVALUATION_INTERVAL: &str = "15s";

/// Regex splitting a `module|destination|name` synthetic address.
const TRIPLE_PATTERN: &str = r"(.+)\|(.+)\|(.+)";

#[derive(Serialize)]
struct TargetsFile {
    global: GlobalDefaults,
    scrape_configs: Vec<ScrapeJob>,
}

#[derive(Serialize)]
struct GlobalDefaults {
    scrape_interval: &'static str,
    evaluation_interval: &'static str,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            scrape_interval: GLOBAL_SCRAPE_INTERVAL,
            evaluation_interval: GLOBAL_EVALUATION_INTERVAL,
        }
    }
}

#[derive(Serialize)]
struct ScrapeJob {
    job_name: String,
    scrape_interval: String,
    metrics_path: &'static str,
    static_configs: Vec<StaticTargets>,
    relabel_configs: Vec<RelabelRule>,
}

#[derive(Serialize)]
struct StaticTargets {
    targets: Vec<String>,
}

#[derive(Serialize)]
struct RelabelRule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    source_labels: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    regex: Option<&'static str>,
    target_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    replacement: Option<String>,
}

impl RelabelRule {
    /// Rule extracting one capture of the synthetic address into a label.
    fn extract(target_label: &'static str, replacement: &str) -> Self {
        Self {
            source_labels: vec!["__address__"],
            regex: Some(TRIPLE_PATTERN),
            target_label,
            replacement: Some(replacement.to_string()),
        }
    }
}

/// The relabeling contract: split the synthetic address back into the
/// probe parameters and labels, then point the scrape at the exporter.
fn relabel_rules(exporter: &str) -> Vec<RelabelRule> {
    vec![
        RelabelRule::extract("__param_target", "${2}"),
        RelabelRule::extract("__param_module", "${1}"),
        RelabelRule::extract("module", "${1}"),
        RelabelRule::extract("name", "${3}"),
        RelabelRule {
            source_labels: vec!["__param_target"],
            regex: None,
            target_label: "instance",
            replacement: None,
        },
        RelabelRule {
            source_labels: Vec::new(),
            regex: None,
            target_label: "__address__",
            replacement: Some(exporter.to_string()),
        },
    ]
}

fn strip_scheme(destination: &str) -> &str {
    destination
        .strip_prefix("https://")
        .or_else(|| destination.strip_prefix("http://"))
        .unwrap_or(destination)
}

fn synthetic_address(target: &TargetEntry) -> String {
    format!("{}|{}|{}", target.module, target.destination, target.name)
}

fn sort_key(target: &TargetEntry) -> (&str, &str, &str) {
    (
        strip_scheme(&target.destination),
        target.name.as_str(),
        target.module.as_str(),
    )
}

impl TargetCollection {
    /// Entries sorted by (scheme-stripped destination, display name,
    /// module name). The sort is stable: equal keys keep registration
    /// order, so output is reproducible across runs.
    fn sorted(&self) -> Vec<&TargetEntry> {
        let mut sorted: Vec<&TargetEntry> = self.targets.iter().collect();
        sorted.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        sorted
    }

    /// One scrape-job block per effective interval, interval ascending.
    fn scrape_jobs(&self) -> Vec<ScrapeJob> {
        let mut groups: BTreeMap<u64, Vec<&TargetEntry>> = BTreeMap::new();
        for target in self.sorted() {
            groups
                .entry(self.effective_interval(target).as_secs())
                .or_default()
                .push(target);
        }

        groups
            .into_iter()
            .map(|(secs, members)| ScrapeJob {
                job_name: format!("{}_{}", self.job_name, secs),
                scrape_interval: format!("{secs}s"),
                metrics_path: "/probe",
                static_configs: vec![StaticTargets {
                    targets: members.iter().map(|t| synthetic_address(t)).collect(),
                }],
                relabel_configs: relabel_rules(&self.exporter),
            })
            .collect()
    }

    /// Render the full target file: global scrape/evaluation defaults
    /// followed by the scrape-job blocks.
    ///
    /// # Errors
    /// Returns [`BuildError::Serialize`] on serialization failure.
    pub fn render(&self) -> Result<String, BuildError> {
        let file = TargetsFile {
            global: GlobalDefaults::default(),
            scrape_configs: self.scrape_jobs(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Render only the scrape-job blocks, for callers managing global
    /// settings separately.
    ///
    /// # Errors
    /// Returns [`BuildError::Serialize`] on serialization failure.
    pub fn render_scrape_configs(&self) -> Result<String, BuildError> {
        Ok(serde_yaml::to_string(&self.scrape_jobs())?)
    }
}
