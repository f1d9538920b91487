//! HTTP probe parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{IpProtocol, is_false};

/// Parameters for an HTTP endpoint probe.
///
/// Field names follow the exporter's YAML schema; unset fields are omitted
/// from the rendered module file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpProbe {
    /// Status codes the probe accepts as success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_status_codes: Vec<u16>,

    /// IP protocol family to probe over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_ip_protocol: Option<IpProtocol>,

    /// Do not follow redirects; assert on the redirect response itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_follow_redirects: Option<bool>,

    /// Request headers to send with the probe.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Patterns the response body must match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail_if_body_not_matches_regexp: Vec<String>,

    /// Patterns named response headers must match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail_if_header_not_matches_regexp: Vec<HeaderMatch>,
}

/// One response-header match requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderMatch {
    /// Header name.
    pub header: String,
    /// Pattern the header value must match.
    pub regexp: String,
    /// Treat a missing header as a pass instead of a failure.
    #[serde(default, skip_serializing_if = "is_false")]
    pub allow_missing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_probe_serializes_empty() {
        let yaml = serde_yaml::to_string(&HttpProbe::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }

    #[test]
    fn test_header_match_omits_allow_missing_when_false() {
        let m = HeaderMatch {
            header: "Location".to_string(),
            regexp: "https://example\\.com".to_string(),
            allow_missing: false,
        };
        let yaml = serde_yaml::to_string(&m).unwrap();
        assert!(yaml.contains("header: Location"));
        assert!(!yaml.contains("allow_missing"));
    }

    #[test]
    fn test_headers_serialize_in_key_order() {
        let mut probe = HttpProbe::default();
        probe.headers.insert("X-Beta".to_string(), "2".to_string());
        probe.headers.insert("Accept".to_string(), "text/html".to_string());
        let yaml = serde_yaml::to_string(&probe).unwrap();
        let accept = yaml.find("Accept").unwrap();
        let beta = yaml.find("X-Beta").unwrap();
        assert!(accept < beta);
    }
}
