//! Pure constructors for probe modules.
//!
//! Builders return a canonical [`ModuleEntry`] for one probe kind and never
//! touch the registry. HTTP and DNS probes are restricted to IPv4; probing
//! over IPv6 is deliberately out of scope.

use crate::module::ModuleEntry;
use crate::probe::{
    HeaderMatch, IpProtocol, ProbeModule, QueryResponse, RecordType,
};

/// HTTP status check: the endpoint must answer with `status`.
///
/// Named `http_<status>` by default, so uncustomized checks of the same
/// status share one module.
pub fn http_status(status: u16) -> ModuleEntry {
    let mut probe = ProbeModule::http();
    let http = probe.http_mut();
    http.valid_status_codes = vec![status];
    http.preferred_ip_protocol = Some(IpProtocol::V4);

    ModuleEntry::new(format!("http_{status}"), probe)
}

/// Redirect check: the endpoint must answer `status` with a `Location`
/// header literally equal to `dest`.
///
/// Redirects are not followed, and `dest` is escaped so metacharacters in
/// the destination match literally rather than as patterns.
pub fn redirect(status: u16, dest: &str) -> ModuleEntry {
    let mut entry = http_status(status);
    let http = entry.probe.http_mut();
    http.no_follow_redirects = Some(true);
    http.fail_if_header_not_matches_regexp = vec![HeaderMatch {
        header: "Location".to_string(),
        regexp: regex::escape(dest),
        allow_missing: false,
    }];

    entry.name = String::new();
    entry.description = format!("{status} to {dest}");
    entry
}

/// DNS query check: issue a `qtype` query for `qname`.
pub fn dns_query(qtype: RecordType, qname: &str) -> ModuleEntry {
    let mut probe = ProbeModule::dns();
    let dns = probe.dns_mut();
    dns.query_name = qname.to_string();
    dns.query_type = qtype;
    dns.preferred_ip_protocol = Some(IpProtocol::V4);

    let mut entry = ModuleEntry::new("", probe);
    entry.description = format!("dns query for {qname:?}");
    entry
}

/// TCP scripted-conversation check, executing `script` in order.
pub fn tcp_script(script: Vec<QueryResponse>) -> ModuleEntry {
    let description = format!("tcp script {}", describe_script(&script));

    let mut probe = ProbeModule::tcp();
    let tcp = probe.tcp_mut();
    tcp.query_response = script;
    tcp.preferred_ip_protocol = Some(IpProtocol::V4);

    let mut entry = ModuleEntry::new("", probe);
    entry.description = description;
    entry
}

/// SMTP greeting script: expect a 220 greeting, then quit.
pub fn smtp_script() -> Vec<QueryResponse> {
    vec![
        QueryResponse::expect(r"^220.+E?SMTP.*"),
        QueryResponse::send("QUIT\r"),
    ]
}

/// IMAP greeting script: expect an untagged OK greeting, then quit.
pub fn imap_script() -> Vec<QueryResponse> {
    vec![
        QueryResponse::expect(r"^\* OK \[.+IMAP4.+"),
        QueryResponse::send("QUIT\r"),
    ]
}

/// NNTP greeting script: expect a 200 greeting, then quit.
pub fn nntp_script() -> Vec<QueryResponse> {
    vec![
        QueryResponse::expect(r"^200\s"),
        QueryResponse::send("QUIT\r"),
    ]
}

fn describe_script(script: &[QueryResponse]) -> String {
    let mut out = String::new();
    for step in script {
        out.push_str(&format!(
            "{:?} -> {:?},",
            step.send.as_deref().unwrap_or(""),
            step.expect.as_deref().unwrap_or("")
        ));
    }
    out
}
