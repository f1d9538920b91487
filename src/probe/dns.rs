//! DNS probe parameters.

use serde::{Deserialize, Serialize};

use super::IpProtocol;

/// DNS record type for a query probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    #[default]
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Srv,
    Txt,
}

impl std::str::FromStr for RecordType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "NS" => Ok(Self::Ns),
            "PTR" => Ok(Self::Ptr),
            "SOA" => Ok(Self::Soa),
            "SRV" => Ok(Self::Srv),
            "TXT" => Ok(Self::Txt),
            _ => Err(()),
        }
    }
}

impl RecordType {
    /// Get the record type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }
}

/// Parameters for a DNS query probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsProbe {
    /// Name to query.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query_name: String,

    /// Record type to query.
    #[serde(default)]
    pub query_type: RecordType,

    /// IP protocol family to probe over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_ip_protocol: Option<IpProtocol>,

    /// Validation applied to answer records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_answer_rrs: Option<RrValidator>,

    /// Validation applied to authority records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_authority_rrs: Option<RrValidator>,
}

/// Positive/negative pattern validation for a resource record section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RrValidator {
    /// Fail the probe if any record matches one of these patterns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail_if_matches_regexp: Vec<String>,

    /// Fail the probe unless a record matches one of these patterns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fail_if_not_matches_regexp: Vec<String>,
}
