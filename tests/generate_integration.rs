//! End-to-end generation tests for probegen.
//!
//! Each test composes rules through the public API and inspects the
//! rendered module/target files the way a downstream scraper would see
//! them.

use std::time::Duration;

use probegen::{Config, RecordType, RuleOption};

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a config with the default job name, exporter, and 30s interval.
fn new_config() -> Config {
    Config::new("blackbox", "localhost:9998", Duration::from_secs(30))
}

/// Position of `needle` in `haystack`, panicking with context on a miss.
fn pos(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("expected {needle:?} in:\n{haystack}"))
}

// =============================================================================
// End-to-End Scenarios
// =============================================================================

#[test]
fn test_http_rule_with_auto_redirect_renders_one_job_block() {
    let mut config = new_config();
    config
        .add_http_rule_with_redirect(
            "https://example.com",
            vec![RuleOption::BodyContains(vec!["Welcome".to_string()])],
        )
        .unwrap();

    // Two modules: the customized status check (content-derived name) and
    // the redirect module.
    assert_eq!(config.modules.len(), 2);
    assert!(config.modules.contains("redir_to_https_example_com"));
    let derived = config
        .modules
        .iter()
        .find(|m| m.name.starts_with("mod_"))
        .expect("customized status check should get a content-derived name");
    assert!(derived.customized);

    assert_eq!(config.targets.len(), 2);

    // Default interval everywhere: exactly one job block.
    let yaml = config.render_targets(false).unwrap();
    assert_eq!(yaml.matches("job_name:").count(), 1);
    assert!(yaml.contains("job_name: blackbox_30"));

    // Both synthetic addresses present, sorted by stripped destination
    // (equal here), then display name: mod_… before redir_to_….
    let status_addr = pos(&yaml, &format!("{}|https://example.com|", derived.name));
    let redirect_addr = pos(
        &yaml,
        "redir_to_https_example_com|http://example.com|redir_to_https_example_com",
    );
    assert!(status_addr < redirect_addr);
}

#[test]
fn test_differing_interval_overrides_render_separate_job_blocks() {
    let mut config = new_config();
    config
        .add_http_rule(
            "https://example.com",
            vec![RuleOption::ScrapeInterval(Duration::from_secs(60))],
        )
        .unwrap();
    config
        .add_http_rule(
            "https://example.org",
            vec![RuleOption::ScrapeInterval(Duration::from_secs(15))],
        )
        .unwrap();

    let yaml = config.render_targets(true).unwrap();
    assert_eq!(yaml.matches("job_name:").count(), 2);

    // Blocks ordered interval-ascending, each holding its own target.
    let fast_block = pos(&yaml, "job_name: blackbox_15");
    let slow_block = pos(&yaml, "job_name: blackbox_60");
    assert!(fast_block < slow_block);

    let fast_target = pos(&yaml, "https://example.org");
    let slow_target = pos(&yaml, "https://example.com");
    assert!(fast_block < fast_target && fast_target < slow_block);
    assert!(slow_block < slow_target);
}

#[test]
fn test_full_build_covers_every_probe_kind() {
    let mut config = new_config();
    config
        .add_http_rule("https://www.example.com", vec![])
        .unwrap();
    config
        .add_redirect_rule(
            "http://example.org/",
            "https://example.org/",
            vec![RuleOption::Status(vec![301])],
        )
        .unwrap();
    config
        .add_dns_rule("9.9.9.9", RecordType::Mx, "example.com", vec![])
        .unwrap();
    config.add_smtp_rule("mail.example.com:25", vec![]).unwrap();
    config
        .add_imap_rule("mail.example.com:993", vec![RuleOption::TcpTls])
        .unwrap();
    config.add_nntp_rule("news.example.com:119", vec![]).unwrap();

    let modules = config.render_modules().unwrap();
    assert!(modules.starts_with("modules:"));
    for expected in [
        "http_200",
        "redir_to_https_example_org",
        "dns_example_com_MX",
        "smtp",
        "imap_tls",
        "nntp",
        "prober: http",
        "prober: dns",
        "prober: tcp",
    ] {
        assert!(modules.contains(expected), "missing {expected:?}");
    }

    // Module file keys are lexicographically sorted.
    let names = [
        "dns_example_com_MX",
        "http_200",
        "imap_tls",
        "nntp",
        "redir_to_https_example_org",
        "smtp",
    ];
    let mut last = 0;
    for name in names {
        let at = pos(&modules, name);
        assert!(at >= last, "{name} out of lexicographic order");
        last = at;
    }

    // All six targets share the default interval: one job block.
    let targets = config.render_targets(false).unwrap();
    assert_eq!(targets.matches("metrics_path: /probe").count(), 1);
    for triple in [
        "http_200|https://www.example.com|https://www.example.com",
        "redir_to_https_example_org|http://example.org/|redir_to_https_example_org",
        "dns_example_com_MX|9.9.9.9|dns_example_com_MX",
        "smtp|mail.example.com:25|smtp",
        "imap_tls|mail.example.com:993|imap_tls",
        "nntp|news.example.com:119|nntp",
    ] {
        assert!(targets.contains(triple), "missing target triple {triple:?}");
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_identical_builds_render_byte_identical_files() {
    let build = || {
        let mut config = new_config();
        config
            .add_http_rule_with_redirect(
                "https://www.example.com",
                vec![RuleOption::BodyContains(vec!["ok".to_string()])],
            )
            .unwrap();
        config
            .add_dns_rule(
                "9.9.9.9",
                RecordType::A,
                "www.example.com",
                vec![RuleOption::DnsAnswerFailIfNotMatches(vec![
                    "192\\.0\\.2\\.10".to_string(),
                ])],
            )
            .unwrap();
        config.add_smtp_rule("mail.example.com:25", vec![]).unwrap();
        (
            config.render_modules().unwrap(),
            config.render_targets(false).unwrap(),
        )
    };

    let (modules_a, targets_a) = build();
    let (modules_b, targets_b) = build();
    assert_eq!(modules_a, modules_b);
    assert_eq!(targets_a, targets_b);
}

// =============================================================================
// File Output
// =============================================================================

#[test]
fn test_write_files_produces_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let modules_path = dir.path().join("blackbox.yaml");
    let targets_path = dir.path().join("prometheus.yaml");

    let mut config = new_config();
    config
        .add_http_rule("https://example.com", vec![])
        .unwrap();
    config
        .write_files(&modules_path, &targets_path, false)
        .unwrap();

    let modules = std::fs::read_to_string(&modules_path).unwrap();
    assert!(modules.starts_with("modules:"));
    assert!(modules.contains("http_200"));

    let targets = std::fs::read_to_string(&targets_path).unwrap();
    assert!(targets.starts_with("global:"));
    assert!(targets.contains("job_name: blackbox_30"));
    assert!(targets.contains("http_200|https://example.com|https://example.com"));
}

#[test]
fn test_write_files_targets_only_mode() {
    let dir = tempfile::tempdir().unwrap();
    let modules_path = dir.path().join("blackbox.yaml");
    let targets_path = dir.path().join("scrape.yaml");

    let mut config = new_config();
    config
        .add_http_rule("https://example.com", vec![])
        .unwrap();
    config
        .write_files(&modules_path, &targets_path, true)
        .unwrap();

    let targets = std::fs::read_to_string(&targets_path).unwrap();
    assert!(!targets.contains("global:"));
    assert!(targets.contains("job_name: blackbox_30"));
}
