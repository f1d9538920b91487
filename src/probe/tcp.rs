//! TCP probe parameters.

use serde::{Deserialize, Serialize};

use super::{IpProtocol, is_false};

/// Parameters for a scripted TCP conversation probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TcpProbe {
    /// Conversation script, executed in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_response: Vec<QueryResponse>,

    /// IP protocol family to probe over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_ip_protocol: Option<IpProtocol>,

    /// Wrap the connection in TLS.
    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,

    /// TLS settings, only meaningful when `tls` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,
}

/// One step of a TCP conversation: wait for a pattern, or send a line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Pattern the next server response must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<String>,

    /// Text to send to the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send: Option<String>,
}

impl QueryResponse {
    /// Step that waits for a server response matching `pattern`.
    pub fn expect(pattern: impl Into<String>) -> Self {
        Self {
            expect: Some(pattern.into()),
            send: None,
        }
    }

    /// Step that sends `text` to the server.
    pub fn send(text: impl Into<String>) -> Self {
        Self {
            expect: None,
            send: Some(text.into()),
        }
    }
}

/// TLS settings for a TCP probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Skip verification of the server certificate chain.
    #[serde(default, skip_serializing_if = "is_false")]
    pub insecure_skip_verify: bool,
}
