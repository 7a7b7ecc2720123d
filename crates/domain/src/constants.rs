use std::time::Duration;

pub const MIN_UDP_BUF_SIZE: u16 = 512;

/// UDP payload size advertised in the EDNS0 OPT record.
pub const DEFAULT_UDP_BUF_SIZE: u16 = 4096;

pub const MAX_MAX_CNAMES: u8 = 10;

pub const DEFAULT_DNS_PORT: u16 = 53;
pub const DEFAULT_DOT_PORT: u16 = 853;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Media type for DNS-over-HTTPS requests and responses (RFC 8484 §6).
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";
