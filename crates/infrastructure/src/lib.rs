//! resolv infrastructure layer: wire transports behind the `DnsTransport` port.
pub mod dns;

pub use dns::transport::{create_transport, Transport};
