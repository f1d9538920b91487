//! Rule options: named adjustments applied to a module/target pair.
//!
//! Options are an ordered list of tagged variants applied by a single
//! dispatch loop. The first module-affecting option clears the module's
//! default name and marks it customized, exactly once per registration, so
//! an adjusted module is never silently merged by name with an unrelated
//! default-named module of the same builder kind. Later options overwrite
//! scalar fields; list-valued adjustments append.

use std::fmt;
use std::time::Duration;

use crate::module::ModuleEntry;
use crate::probe::{ProbeModule, RrValidator};
use crate::target::TargetEntry;

/// One named adjustment to a module, a target, or both.
pub enum RuleOption {
    /// Override the set of acceptable HTTP status codes.
    Status(Vec<u16>),
    /// Set an explicit module name (spaces become dashes).
    Name(String),
    /// Require the response body to contain these substrings, matched
    /// literally.
    BodyContains(Vec<String>),
    /// Do not follow redirects.
    NoFollowRedirects,
    /// Set a request header.
    Header(String, String),
    /// Fail if any DNS answer record matches one of these patterns.
    DnsAnswerFailIfMatches(Vec<String>),
    /// Fail unless a DNS answer record matches one of these patterns.
    DnsAnswerFailIfNotMatches(Vec<String>),
    /// Fail if any DNS authority record matches one of these patterns.
    DnsAuthorityFailIfMatches(Vec<String>),
    /// Fail unless a DNS authority record matches one of these patterns.
    DnsAuthorityFailIfNotMatches(Vec<String>),
    /// Wrap the TCP conversation in TLS and suffix the module name with
    /// `_tls`.
    TcpTls,
    /// Set the probe timeout.
    Timeout(Duration),
    /// Override the scrape interval for this target only.
    ScrapeInterval(Duration),
    /// Escape hatch: apply an arbitrary mutation to the probe definition.
    Custom(Box<dyn Fn(&mut ProbeModule)>),
}

impl RuleOption {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "Status",
            Self::Name(_) => "Name",
            Self::BodyContains(_) => "BodyContains",
            Self::NoFollowRedirects => "NoFollowRedirects",
            Self::Header(_, _) => "Header",
            Self::DnsAnswerFailIfMatches(_) => "DnsAnswerFailIfMatches",
            Self::DnsAnswerFailIfNotMatches(_) => "DnsAnswerFailIfNotMatches",
            Self::DnsAuthorityFailIfMatches(_) => "DnsAuthorityFailIfMatches",
            Self::DnsAuthorityFailIfNotMatches(_) => "DnsAuthorityFailIfNotMatches",
            Self::TcpTls => "TcpTls",
            Self::Timeout(_) => "Timeout",
            Self::ScrapeInterval(_) => "ScrapeInterval",
            Self::Custom(_) => "Custom",
        }
    }

    /// Whether this option mutates the module (as opposed to the target).
    fn affects_module(&self) -> bool {
        !matches!(self, Self::ScrapeInterval(_))
    }
}

impl fmt::Debug for RuleOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Apply the module-affecting options to `module`, in order.
pub(crate) fn apply_module_options(module: &mut ModuleEntry, options: &[RuleOption]) {
    let mut cleared = false;
    for option in options {
        if !option.affects_module() {
            continue;
        }
        if !cleared {
            module.name.clear();
            module.customized = true;
            cleared = true;
        }
        apply_one(module, option);
    }
}

fn apply_one(module: &mut ModuleEntry, option: &RuleOption) {
    match option {
        RuleOption::Status(codes) => {
            module.description.push_str(&format!("Status({codes:?}) "));
            module.probe.http_mut().valid_status_codes = codes.clone();
        }
        RuleOption::Name(name) => {
            module.name = name.replace(' ', "-");
        }
        RuleOption::BodyContains(substrings) => {
            module
                .description
                .push_str(&format!("Contains({substrings:?}) "));
            let http = module.probe.http_mut();
            for s in substrings {
                http.fail_if_body_not_matches_regexp.push(regex::escape(s));
            }
        }
        RuleOption::NoFollowRedirects => {
            module.description.push_str("NoFollowRedirects() ");
            module.probe.http_mut().no_follow_redirects = Some(true);
        }
        RuleOption::Header(key, value) => {
            module
                .probe
                .http_mut()
                .headers
                .insert(key.clone(), value.clone());
        }
        RuleOption::DnsAnswerFailIfMatches(patterns) => {
            answer_validator(&mut module.probe).fail_if_matches_regexp = patterns.clone();
        }
        RuleOption::DnsAnswerFailIfNotMatches(patterns) => {
            answer_validator(&mut module.probe).fail_if_not_matches_regexp = patterns.clone();
        }
        RuleOption::DnsAuthorityFailIfMatches(patterns) => {
            authority_validator(&mut module.probe).fail_if_matches_regexp = patterns.clone();
        }
        RuleOption::DnsAuthorityFailIfNotMatches(patterns) => {
            authority_validator(&mut module.probe).fail_if_not_matches_regexp = patterns.clone();
        }
        RuleOption::TcpTls => {
            module.probe.tcp_mut().tls = true;
            module.name.push_str("_tls");
        }
        RuleOption::Timeout(timeout) => {
            module.probe.timeout = Some(*timeout);
        }
        RuleOption::Custom(mutate) => {
            mutate(&mut module.probe);
        }
        RuleOption::ScrapeInterval(_) => {}
    }
}

fn answer_validator(probe: &mut ProbeModule) -> &mut RrValidator {
    probe
        .dns_mut()
        .validate_answer_rrs
        .get_or_insert_with(RrValidator::default)
}

fn authority_validator(probe: &mut ProbeModule) -> &mut RrValidator {
    probe
        .dns_mut()
        .validate_authority_rrs
        .get_or_insert_with(RrValidator::default)
}

/// Apply the target-affecting options to `target`, in order.
pub(crate) fn apply_target_options(target: &mut TargetEntry, options: &[RuleOption]) {
    for option in options {
        if let RuleOption::ScrapeInterval(interval) = option {
            target.scrape_interval = Some(*interval);
        }
    }
}
