//! Probegen - Blackbox Exporter Configuration Generator
//!
//! This crate builds the two artifacts needed to run a blackbox
//! network-probing exporter: a probe-module definition file (what to check
//! and how) and a scrape-target file (what to check and how often), both
//! consumable by a metrics-scraping system. Callers compose rules
//! imperatively through [`Config`] and the crate renders both files
//! deterministically — the same rule set always produces byte-identical
//! output.
//!
//! It never performs or schedules probes itself; it only emits declarative
//! configuration for the external scraping/probing pair.
//!
//! # Architecture
//!
//! - **Probe schema** ([`probe`]): typed module definitions (HTTP, DNS, TCP)
//! - **Module registry** ([`module`]): content-addressed naming and
//!   deduplication
//! - **Options** ([`options`]): ordered adjustments applied to a
//!   module/target pair
//! - **Targets** ([`target`]): stable-sorted, interval-grouped scrape-config
//!   rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use probegen::{Config, RuleOption};
//!
//! fn main() -> Result<(), probegen::BuildError> {
//!     let mut config = Config::new("blackbox", "localhost:9998", Duration::from_secs(30));
//!
//!     config.add_http_rule_with_redirect(
//!         "https://www.example.com",
//!         vec![RuleOption::BodyContains(vec!["Example Domain".into()])],
//!     )?;
//!     config.add_smtp_rule("mail.example.com:25", vec![])?;
//!
//!     config.write_files("blackbox.yaml", "prometheus.yaml", false)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod module;
pub mod options;
pub mod probe;
pub mod target;

pub use config::Config;
pub use error::BuildError;
pub use module::{ModuleEntry, ModuleRegistry, builder};
pub use options::RuleOption;
pub use probe::{
    DnsProbe, HeaderMatch, HttpProbe, IpProtocol, ProbeModule, Prober, QueryResponse, RecordType,
    RrValidator, TcpProbe, TlsConfig,
};
pub use target::{TargetCollection, TargetEntry};
