//! Top-level configuration builder.
//!
//! [`Config`] composes the module registry and the target collection and
//! exposes one rule-adding method per probe kind. Each rule method builds
//! the canonical module, applies the caller's options, registers the module
//! under its final name, and records a target bound to that name. Final
//! serialization renders the module registry to one file and the target
//! collection to another.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::error::BuildError;
use crate::module::{ModuleRegistry, builder};
use crate::options::{self, RuleOption};
use crate::probe::{QueryResponse, RecordType};
use crate::target::{TargetCollection, TargetEntry};

/// Default timeout for SMTP and IMAP greeting checks.
const MAIL_GREETING_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for NNTP greeting checks.
const NNTP_GREETING_TIMEOUT: Duration = Duration::from_secs(10);

/// Redirect statuses accepted by the HTTPS auto-redirect rule.
const HTTPS_REDIRECT_STATUSES: [u16; 3] = [301, 302, 308];

/// Reduce a derived name to the identifier alphabet: strip a trailing `/`,
/// replace every other run of disallowed characters with `_`.
fn clean_name(raw: &str) -> String {
    static ID_CHARS: OnceLock<Regex> = OnceLock::new();
    let re = ID_CHARS
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("failed to compile id regex"));
    re.replace_all(raw.trim_end_matches('/'), "_").into_owned()
}

/// Probe configuration under construction: module registry plus target
/// collection.
#[derive(Debug)]
pub struct Config {
    /// Registered probe modules.
    pub modules: ModuleRegistry,
    /// Recorded scrape targets.
    pub targets: TargetCollection,
}

impl Config {
    /// Create an empty configuration.
    pub fn new(
        job_name: impl Into<String>,
        exporter: impl Into<String>,
        scrape_interval: Duration,
    ) -> Self {
        Self {
            modules: ModuleRegistry::new(),
            targets: TargetCollection::new(job_name, exporter, scrape_interval),
        }
    }

    /// Add an HTTP 200 check on `url`.
    ///
    /// The target's display name is the URL itself unless options were
    /// given, in which case it is the module's resolved name.
    ///
    /// # Errors
    /// Fails on a malformed URL or an unserializable module.
    pub fn add_http_rule(
        &mut self,
        url: &str,
        options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        parse_url(url)?;

        let mut module = builder::http_status(200);
        let has_options = !options.is_empty();
        options::apply_module_options(&mut module, &options);
        let name = self.modules.register(module)?;

        let display = if has_options {
            name.clone()
        } else {
            url.to_string()
        };
        let mut target = TargetEntry::new(name.clone(), url, display);
        options::apply_target_options(&mut target, &options);
        self.targets.push(target);
        Ok(name)
    }

    /// Add an HTTP 200 check on `url`, plus — for HTTPS URLs — a companion
    /// check that the plain-HTTP variant redirects to HTTPS with 301, 302
    /// or 308.
    ///
    /// # Errors
    /// Fails on a malformed URL or an unserializable module.
    pub fn add_http_rule_with_redirect(
        &mut self,
        url: &str,
        options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        let name = self.add_http_rule(url, options)?;
        if url.starts_with("https://") {
            self.add_https_redirect_rule(
                url,
                vec![RuleOption::Status(HTTPS_REDIRECT_STATUSES.to_vec())],
            )?;
        }
        Ok(name)
    }

    /// Add a check that the plain-HTTP variant of `url` redirects to its
    /// HTTPS variant.
    ///
    /// # Errors
    /// Fails on a malformed URL or an unserializable module.
    pub fn add_https_redirect_rule(
        &mut self,
        url: &str,
        mut options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        let src = url.replacen("https://", "http://", 1);
        let dst = url.replacen("http://", "https://", 1);

        let name = clean_name(&format!(
            "redir_to_{}",
            dst.strip_prefix("http://").unwrap_or(&dst)
        ));
        options.push(RuleOption::Name(name));
        self.add_redirect_rule(&src, &dst, options)
    }

    /// Add a check that `src` redirects to exactly `dst`.
    ///
    /// The `Location` header must literally equal `dst`; metacharacters in
    /// the destination do not act as patterns.
    ///
    /// # Errors
    /// Fails on a malformed URL or an unserializable module.
    pub fn add_redirect_rule(
        &mut self,
        src: &str,
        dst: &str,
        mut options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        parse_url(src)?;
        parse_url(dst)?;

        let mut module = builder::redirect(302, dst);
        let name = clean_name(&format!(
            "redir_to_{}",
            dst.strip_prefix("http://").unwrap_or(dst)
        ));
        options.push(RuleOption::Name(name));
        options::apply_module_options(&mut module, &options);
        let name = self.modules.register(module)?;

        let mut target = TargetEntry::new(name.clone(), src, name.clone());
        options::apply_target_options(&mut target, &options);
        self.targets.push(target);
        Ok(name)
    }

    /// Add a DNS check: query `server` for the `qtype` record of `qname`.
    ///
    /// # Errors
    /// Fails on an unserializable module.
    pub fn add_dns_rule(
        &mut self,
        server: &str,
        qtype: RecordType,
        qname: &str,
        mut options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        let mut module = builder::dns_query(qtype, qname);
        let name = clean_name(&format!("dns_{}_{}", qname, qtype.as_str()));
        options.push(RuleOption::Name(name));
        options::apply_module_options(&mut module, &options);
        let name = self.modules.register(module)?;

        let mut target = TargetEntry::new(name.clone(), server, name.clone());
        options::apply_target_options(&mut target, &options);
        self.targets.push(target);
        Ok(name)
    }

    /// Add a TCP scripted-conversation check against `server`.
    ///
    /// # Errors
    /// Fails on an unserializable module.
    pub fn add_tcp_rule(
        &mut self,
        server: &str,
        script: Vec<QueryResponse>,
        options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        let mut module = builder::tcp_script(script);
        options::apply_module_options(&mut module, &options);
        let name = self.modules.register(module)?;

        let mut target = TargetEntry::new(name.clone(), server, name.clone());
        options::apply_target_options(&mut target, &options);
        self.targets.push(target);
        Ok(name)
    }

    /// Add an SMTP greeting check against `server`.
    ///
    /// Defaults to the name `smtp` and a 5s timeout; both adjustable
    /// through `options`.
    ///
    /// # Errors
    /// Fails on an unserializable module.
    pub fn add_smtp_rule(
        &mut self,
        server: &str,
        options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        let mut opts = vec![
            RuleOption::Name("smtp".to_string()),
            RuleOption::Timeout(MAIL_GREETING_TIMEOUT),
        ];
        opts.extend(options);
        self.add_tcp_rule(server, builder::smtp_script(), opts)
    }

    /// Add an IMAP greeting check against `server`.
    ///
    /// Defaults to the name `imap` and a 5s timeout; both adjustable
    /// through `options`.
    ///
    /// # Errors
    /// Fails on an unserializable module.
    pub fn add_imap_rule(
        &mut self,
        server: &str,
        options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        let mut opts = vec![
            RuleOption::Name("imap".to_string()),
            RuleOption::Timeout(MAIL_GREETING_TIMEOUT),
        ];
        opts.extend(options);
        self.add_tcp_rule(server, builder::imap_script(), opts)
    }

    /// Add an NNTP greeting check against `server`.
    ///
    /// Defaults to the name `nntp` and a 10s timeout; both adjustable
    /// through `options`.
    ///
    /// # Errors
    /// Fails on an unserializable module.
    pub fn add_nntp_rule(
        &mut self,
        server: &str,
        options: Vec<RuleOption>,
    ) -> Result<String, BuildError> {
        let mut opts = vec![
            RuleOption::Name("nntp".to_string()),
            RuleOption::Timeout(NNTP_GREETING_TIMEOUT),
        ];
        opts.extend(options);
        self.add_tcp_rule(server, builder::nntp_script(), opts)
    }

    /// Verify that every target's module reference resolves in the
    /// registry.
    ///
    /// # Errors
    /// Returns [`BuildError::UnknownModule`] for the first dangling
    /// reference.
    pub fn check_references(&self) -> Result<(), BuildError> {
        for target in self.targets.targets() {
            if !self.modules.contains(&target.module) {
                return Err(BuildError::UnknownModule {
                    target: target.destination.clone(),
                    module: target.module.clone(),
                });
            }
        }
        Ok(())
    }

    /// Render the module file.
    ///
    /// # Errors
    /// Fails on serialization failure.
    pub fn render_modules(&self) -> Result<String, BuildError> {
        self.modules.render()
    }

    /// Render the target file; `targets_only` omits the global
    /// scrape/evaluation defaults.
    ///
    /// # Errors
    /// Fails on a dangling module reference or serialization failure.
    pub fn render_targets(&self, targets_only: bool) -> Result<String, BuildError> {
        self.check_references()?;
        if targets_only {
            self.targets.render_scrape_configs()
        } else {
            self.targets.render()
        }
    }

    /// Write the module file and the target file.
    ///
    /// # Errors
    /// Fails on a dangling module reference, serialization failure, or
    /// I/O error.
    pub fn write_files(
        &self,
        modules_path: impl AsRef<Path>,
        targets_path: impl AsRef<Path>,
        targets_only: bool,
    ) -> Result<(), BuildError> {
        let modules = self.render_modules()?;
        let targets = self.render_targets(targets_only)?;

        std::fs::write(modules_path.as_ref(), modules)?;
        tracing::info!(
            path = %modules_path.as_ref().display(),
            modules = self.modules.len(),
            "wrote module file"
        );

        std::fs::write(targets_path.as_ref(), targets)?;
        tracing::info!(
            path = %targets_path.as_ref().display(),
            targets = self.targets.len(),
            targets_only,
            "wrote target file"
        );
        Ok(())
    }
}

fn parse_url(url: &str) -> Result<Url, BuildError> {
    Url::parse(url).map_err(|source| BuildError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}
