use super::Client;
use crate::records::collect_records;
use hickory_proto::rr::rdata::{A, AAAA, NS, SOA};
use hickory_proto::rr::RecordType;
use resolv_domain::{Nameserver, ResolveError};
use std::net::IpAddr;
use tracing::debug;

impl Client {
    /// IPv4 addresses of `name`.
    pub async fn ip4s(&mut self, name: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let response = self.lookup(name, RecordType::A).await?;
        let addrs: Vec<IpAddr> = collect_records::<A>(response.answers())
            .iter()
            .map(|rr| IpAddr::V4(rr.data.0))
            .collect();
        non_empty(addrs)
    }

    /// IPv6 addresses of `name`.
    pub async fn ip6s(&mut self, name: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let response = self.lookup(name, RecordType::AAAA).await?;
        let addrs: Vec<IpAddr> = collect_records::<AAAA>(response.answers())
            .iter()
            .map(|rr| IpAddr::V6(rr.data.0))
            .collect();
        non_empty(addrs)
    }

    /// IPv4 then IPv6 addresses of `name`. Fails only if both lookups fail.
    pub async fn ips(&mut self, name: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let mut addrs = Vec::new();
        let mut errors = Vec::new();

        match self.ip4s(name).await {
            Ok(v4) => addrs.extend(v4),
            Err(e) => errors.push(e),
        }
        match self.ip6s(name).await {
            Ok(v6) => addrs.extend(v6),
            Err(e) => errors.push(e),
        }

        if addrs.is_empty() {
            debug!(qname = %name, errors = errors.len(), "No addresses found");
            return Err(ResolveError::join(errors));
        }
        Ok(addrs)
    }

    /// Nameservers of `name` with their addresses.
    ///
    /// When the NS lookup has no usable answer but the server answered
    /// NOERROR, the primary nameserver of an SOA in the authority section is
    /// used instead. Servers whose addresses cannot be resolved are left out;
    /// the call fails only if none resolves.
    pub async fn nameservers(&mut self, name: &str) -> Result<Vec<Nameserver>, ResolveError> {
        let servers = self.nameserver_names(name).await?;

        let mut results = Vec::new();
        let mut errors = Vec::new();
        for server in servers {
            match self.ips(&server).await {
                Ok(addrs) => results.push(Nameserver {
                    name: server,
                    addrs,
                }),
                Err(e) => {
                    debug!(server = %server, error = %e, "Failed to resolve nameserver");
                    errors.push(e);
                }
            }
        }

        if results.is_empty() {
            return Err(if errors.is_empty() {
                ResolveError::BadData
            } else {
                ResolveError::join(errors)
            });
        }
        Ok(results)
    }

    async fn nameserver_names(&mut self, name: &str) -> Result<Vec<String>, ResolveError> {
        let err = match self.lookup(name, RecordType::NS).await {
            Ok(response) => {
                return Ok(collect_records::<NS>(response.answers())
                    .iter()
                    .map(|rr| rr.data.0.to_utf8())
                    .collect())
            }
            Err(err @ ResolveError::Rcode(_)) => return Err(err),
            Err(err) => err,
        };

        let from_soa: Vec<String> = err
            .response()
            .map(|response| {
                collect_records::<SOA>(response.name_servers())
                    .iter()
                    .map(|rr| rr.data.mname().to_utf8())
                    .collect()
            })
            .unwrap_or_default();

        if from_soa.is_empty() {
            return Err(err);
        }
        debug!(qname = %name, servers = ?from_soa, "Using SOA primary nameserver");
        Ok(from_soa)
    }
}

fn non_empty(addrs: Vec<IpAddr>) -> Result<Vec<IpAddr>, ResolveError> {
    if addrs.is_empty() {
        Err(ResolveError::BadData)
    } else {
        Ok(addrs)
    }
}
