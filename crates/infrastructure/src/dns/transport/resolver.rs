use resolv_domain::{AddressFamily, TransportError};
use std::net::SocketAddr;
use std::time::Duration;

/// Resolves a `host:port` server address to the first socket address of the
/// requested family.
pub async fn resolve_server(
    server: &str,
    family: AddressFamily,
    timeout: Duration,
) -> Result<SocketAddr, TransportError> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        if family.matches(&addr.ip()) {
            return Ok(addr);
        }
        return Err(no_address(server, family));
    }

    let addrs = tokio::time::timeout(timeout, tokio::net::lookup_host(server))
        .await
        .map_err(|_| TransportError::Timeout {
            server: server.to_string(),
            stage: "resolving",
        })?
        .map_err(|e| TransportError::Resolve {
            server: server.to_string(),
            reason: e.to_string(),
        })?;

    addrs
        .into_iter()
        .find(|addr| family.matches(&addr.ip()))
        .ok_or_else(|| no_address(server, family))
}

fn no_address(server: &str, family: AddressFamily) -> TransportError {
    TransportError::Resolve {
        server: server.to_string(),
        reason: format!("no {:?} address found", family),
    }
}
