//! Probe module definitions for the blackbox exporter.
//!
//! A probe module describes *how* to check one kind of endpoint — HTTP
//! status, DNS query, TCP conversation — independent of which target it is
//! applied to. The structures here serialize to the exporter's YAML module
//! schema and are otherwise opaque to the rest of the crate: the registry
//! stores and hashes them, it never interprets them.

pub mod dns;
pub mod http;
pub mod tcp;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use dns::{DnsProbe, RecordType, RrValidator};
pub use http::{HeaderMatch, HttpProbe};
pub use tcp::{QueryResponse, TcpProbe, TlsConfig};

/// Prober kind selecting which probe parameters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prober {
    Http,
    Dns,
    Tcp,
}

/// IP protocol family a probe is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpProtocol {
    #[serde(rename = "ip4")]
    V4,
    #[serde(rename = "ip6")]
    V6,
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

/// One probe module definition as consumed by the blackbox exporter.
///
/// Exactly one of the kind-specific sections is populated, matching
/// `prober`. Container-typed fields use ordered collections so that
/// serialization is a pure function of logical content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeModule {
    pub prober: Prober,

    /// Per-probe timeout.
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,

    /// HTTP probe parameters (`prober: http`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpProbe>,

    /// DNS probe parameters (`prober: dns`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsProbe>,

    /// TCP probe parameters (`prober: tcp`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<TcpProbe>,
}

impl ProbeModule {
    /// Create an HTTP probe module with empty parameters.
    pub fn http() -> Self {
        Self {
            prober: Prober::Http,
            timeout: None,
            http: Some(HttpProbe::default()),
            dns: None,
            tcp: None,
        }
    }

    /// Create a DNS probe module with empty parameters.
    pub fn dns() -> Self {
        Self {
            prober: Prober::Dns,
            timeout: None,
            http: None,
            dns: Some(DnsProbe::default()),
            tcp: None,
        }
    }

    /// Create a TCP probe module with empty parameters.
    pub fn tcp() -> Self {
        Self {
            prober: Prober::Tcp,
            timeout: None,
            http: None,
            dns: None,
            tcp: Some(TcpProbe::default()),
        }
    }

    /// HTTP parameters, created on first access.
    pub fn http_mut(&mut self) -> &mut HttpProbe {
        self.http.get_or_insert_with(HttpProbe::default)
    }

    /// DNS parameters, created on first access.
    pub fn dns_mut(&mut self) -> &mut DnsProbe {
        self.dns.get_or_insert_with(DnsProbe::default)
    }

    /// TCP parameters, created on first access.
    pub fn tcp_mut(&mut self) -> &mut TcpProbe {
        self.tcp.get_or_insert_with(TcpProbe::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prober_serializes_lowercase() {
        let yaml = serde_yaml::to_string(&Prober::Http).unwrap();
        assert_eq!(yaml.trim(), "http");
        let yaml = serde_yaml::to_string(&Prober::Dns).unwrap();
        assert_eq!(yaml.trim(), "dns");
    }

    #[test]
    fn test_ip_protocol_rename() {
        let yaml = serde_yaml::to_string(&IpProtocol::V4).unwrap();
        assert_eq!(yaml.trim(), "ip4");
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let module = ProbeModule::http();
        let yaml = serde_yaml::to_string(&module).unwrap();
        assert!(yaml.contains("prober: http"));
        assert!(!yaml.contains("dns:"));
        assert!(!yaml.contains("tcp:"));
        assert!(!yaml.contains("timeout:"));
    }

    #[test]
    fn test_timeout_serializes_humantime() {
        let mut module = ProbeModule::tcp();
        module.timeout = Some(Duration::from_secs(5));
        let yaml = serde_yaml::to_string(&module).unwrap();
        assert!(yaml.contains("timeout: 5s"));
    }
}
