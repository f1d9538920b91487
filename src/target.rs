//! Scrape targets and their rendering into scrape-config text.
//!
//! A [`TargetEntry`] binds one destination to the probe module that checks
//! it. The [`TargetCollection`] owns all entries plus the collection-wide
//! job name, default scrape interval, and the exporter's host:port, and
//! renders everything into deterministic scrape-config YAML — grouped by
//! effective interval, stably sorted within each group.

mod render;

use std::time::Duration;

/// One (destination, module, display name, interval) binding.
///
/// The module is referenced by name, not ownership; the registry owns the
/// definition. Entries are immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    /// Name of the probe module checking this destination.
    pub module: String,
    /// Destination address or URL handed to the probe.
    pub destination: String,
    /// Human-readable display name, surfaced as the `name` label.
    pub name: String,
    /// Per-target scrape-interval override; `None` uses the collection
    /// default.
    pub scrape_interval: Option<Duration>,
}

impl TargetEntry {
    /// Create a target entry with no interval override.
    pub fn new(
        module: impl Into<String>,
        destination: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            destination: destination.into(),
            name: name.into(),
            scrape_interval: None,
        }
    }
}

/// Ordered collection of scrape targets.
#[derive(Debug, Clone)]
pub struct TargetCollection {
    targets: Vec<TargetEntry>,
    job_name: String,
    exporter: String,
    scrape_interval: Duration,
}

impl TargetCollection {
    /// Create an empty collection.
    pub fn new(
        job_name: impl Into<String>,
        exporter: impl Into<String>,
        scrape_interval: Duration,
    ) -> Self {
        Self {
            targets: Vec::new(),
            job_name: job_name.into(),
            exporter: exporter.into(),
            scrape_interval,
        }
    }

    /// Record a target entry.
    pub fn push(&mut self, target: TargetEntry) {
        self.targets.push(target);
    }

    /// All recorded entries, in registration order.
    pub fn targets(&self) -> &[TargetEntry] {
        &self.targets
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Collection-wide default scrape interval.
    pub fn default_interval(&self) -> Duration {
        self.scrape_interval
    }

    /// A target's own interval override if set, else the collection
    /// default.
    pub fn effective_interval(&self, target: &TargetEntry) -> Duration {
        target.scrape_interval.unwrap_or(self.scrape_interval)
    }
}
