//! resolv application layer: the query engine built on the `DnsTransport` port.
pub mod client;
pub mod ports;
pub mod records;

pub use client::Client;
pub use ports::DnsTransport;
