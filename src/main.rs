//! Probegen Binary Entry Point
//!
//! Generates a sample blackbox exporter configuration: a probe-module file
//! and a scrape-target file. The rule set below exercises the library API;
//! adapt it to your own fleet, or use the crate as a library.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use probegen::{Config, RecordType, RuleOption};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Probegen - blackbox exporter configuration generator
#[derive(Parser, Debug)]
#[command(name = "probegen", version, about, long_about = None)]
struct Cli {
    /// File to write the generated probe modules to
    #[arg(long, default_value = "blackbox.yaml", env = "PROBEGEN_MODULES_FILE")]
    modules_file: PathBuf,

    /// File to write the generated scrape targets to
    #[arg(long, default_value = "prometheus.yaml", env = "PROBEGEN_TARGETS_FILE")]
    targets_file: PathBuf,

    /// host:port of the blackbox exporter probes are routed through
    #[arg(long, default_value = "localhost:9998", env = "PROBEGEN_EXPORTER")]
    exporter: String,

    /// Default scrape interval (e.g. "30s", "5m")
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    scrape_interval: Duration,

    /// job_name for the target definitions
    #[arg(long, default_value = "blackbox")]
    job_name: String,

    /// Only write scrape_configs blocks, omitting global defaults
    #[arg(long)]
    targets_only: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::new(&cli.job_name, &cli.exporter, cli.scrape_interval);
    build_rules(&mut config)?;

    tracing::info!(
        modules = config.modules.len(),
        targets = config.targets.len(),
        "configuration built"
    );

    config.write_files(&cli.modules_file, &cli.targets_file, cli.targets_only)?;
    Ok(())
}

/// Sample rule set covering every probe kind.
fn build_rules(c: &mut Config) -> Result<(), probegen::BuildError> {
    c.add_http_rule_with_redirect(
        "https://www.example.com",
        vec![
            RuleOption::BodyContains(vec!["Example Domain".to_string()]),
            RuleOption::Name("example".to_string()),
        ],
    )?;

    c.add_redirect_rule(
        "https://example.org/",
        "https://www.example.org/",
        vec![RuleOption::Status(vec![302])],
    )?;

    c.add_https_redirect_rule("http://example.net/", vec![])?;

    c.add_dns_rule(
        "9.9.9.9",
        RecordType::A,
        "www.example.com",
        vec![RuleOption::DnsAnswerFailIfNotMatches(vec![
            "192\\.0\\.2\\.10".to_string(),
            "192\\.0\\.2\\.11".to_string(),
        ])],
    )?;

    c.add_smtp_rule("mail.example.com:25", vec![])?;

    c.add_imap_rule(
        "mail.example.com:993",
        vec![
            RuleOption::TcpTls,
            RuleOption::Custom(Box::new(|probe| {
                probe.tcp_mut().tls_config = Some(probegen::TlsConfig {
                    insecure_skip_verify: true,
                });
            })),
        ],
    )?;

    Ok(())
}
