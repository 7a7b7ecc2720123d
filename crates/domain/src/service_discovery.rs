//! Value types produced by DNS-SD (RFC 6763) discovery.

use crate::names::{fqdn, split_labels};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

const PROTOCOL_LABELS: [&str; 3] = ["_tcp", "_udp", "_tls"];

/// Aggregation of a service instance's SRV, TXT and A/AAAA records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInstanceInfo {
    pub name: String,

    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,

    /// One entry per TXT record, each holding that record's strings.
    pub txt: Vec<Vec<String>>,

    pub addrs: Vec<IpAddr>,
}

impl ServiceInstanceInfo {
    /// An SRV target of `.` means the service is decidedly not available
    /// at this name (RFC 2782).
    pub fn has_target(&self) -> bool {
        self.target != "." && !self.target.is_empty()
    }
}

impl fmt::Display for ServiceInstanceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name: {} priority:{} weight:{} port:{} target:{} txt:{:?} addrs: {:?}",
            self.name, self.priority, self.weight, self.port, self.target, self.txt, self.addrs
        )
    }
}

/// A service instance name split into `<instance>.<service>.<proto>.<domain>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceName {
    pub instance: String,
    /// `<service>.<proto>` pair, e.g. `_ipp._tcp`.
    pub service: Option<String>,
    pub domain: String,
}

impl InstanceName {
    /// Locates the rightmost `_tcp`/`_udp`/`_tls` label and takes the label
    /// before it as the service name. Names without such a pair come back
    /// with no service and the whole name as domain.
    pub fn parse(name: &str) -> Self {
        let labels = split_labels(name);
        let proto_index = labels
            .iter()
            .rposition(|label| PROTOCOL_LABELS.contains(&label.as_str()));

        match proto_index {
            Some(i) if i >= 1 => Self {
                instance: labels[..i - 1].join("."),
                service: Some(format!("{}.{}", labels[i - 1], labels[i])),
                domain: fqdn(&labels[i + 1..].join(".")),
            },
            _ => Self {
                instance: String::new(),
                service: None,
                domain: name.to_string(),
            },
        }
    }
}

/// A nameserver name with the addresses it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nameserver {
    pub name: String,
    pub addrs: Vec<IpAddr>,
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "name: {}, addrs: {:?}", self.name, self.addrs)
    }
}

/// A NAPTR record (RFC 3403) with its character-strings decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NaptrRecord {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub services: String,
    pub regexp: String,
    pub replacement: String,
}

impl fmt::Display for NaptrRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order:{} preference:{} flags:{:?} services:{:?} regexp:{:?} replacement:{}",
            self.order, self.preference, self.flags, self.services, self.regexp, self.replacement
        )
    }
}

/// Result of walking a domain's DNS-SD tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceDiscovery {
    pub browse_domains: Vec<String>,
    /// Instances keyed by `<service>.<proto>`.
    pub services: BTreeMap<String, Vec<ServiceInstanceInfo>>,
}

impl ServiceDiscovery {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn instance_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }
}
