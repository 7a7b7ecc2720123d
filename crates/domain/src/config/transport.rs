use super::errors::ConfigError;
use crate::constants::{
    DEFAULT_DNS_PORT, DEFAULT_DOT_PORT, DEFAULT_TIMEOUT, DEFAULT_UDP_BUF_SIZE, MIN_UDP_BUF_SIZE,
};
use crate::names::join_host_port;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Address family a transport is restricted to when resolving its server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    Any,
    V4,
    V6,
}

impl AddressFamily {
    /// The two flags are meant to be exclusive; if both are set the
    /// IPv6 restriction wins.
    pub fn from_flags(ipv4_only: bool, ipv6_only: bool) -> Self {
        if ipv6_only {
            Self::V6
        } else if ipv4_only {
            Self::V4
        } else {
            Self::Any
        }
    }

    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            Self::Any => true,
            Self::V4 => ip.is_ipv4(),
            Self::V6 => ip.is_ipv6(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum TransportConfig {
    Udp(UdpConfig),
    Tcp(TcpConfig),
    Tls(TlsConfig),
    Https(HttpsConfig),
}

impl TransportConfig {
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
            Self::Tls(_) => "TLS",
            Self::Https(_) => "HTTPS",
        }
    }

    /// Server address or URL, for logging.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Udp(c) => &c.server,
            Self::Tcp(c) => &c.server,
            Self::Tls(c) => &c.server,
            Self::Https(c) => &c.url,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (ipv4_only, ipv6_only) = match self {
            Self::Udp(c) => (c.ipv4_only, c.ipv6_only),
            Self::Tcp(c) => (c.ipv4_only, c.ipv6_only),
            Self::Tls(c) => (c.ipv4_only, c.ipv6_only),
            Self::Https(c) => {
                if !c.url.starts_with("https://") && !c.url.starts_with("http://") {
                    return Err(ConfigError::Validation(format!(
                        "DoH URL must be http(s): {}",
                        c.url
                    )));
                }
                (false, false)
            }
        };
        if ipv4_only && ipv6_only {
            return Err(ConfigError::Validation(
                "ipv4_only and ipv6_only are mutually exclusive".to_string(),
            ));
        }
        if self.endpoint().is_empty() {
            return Err(ConfigError::Validation(
                "transport server must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Udp(UdpConfig::new("127.0.0.1"))
    }
}

/// DNS over UDP port 53.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UdpConfig {
    pub server: String,

    #[serde(default)]
    pub ipv4_only: bool,

    #[serde(default)]
    pub ipv6_only: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Size of the receive buffer for responses.
    #[serde(default = "default_udp_buf_size")]
    pub udp_buf_size: u16,

    /// Return truncated responses as-is instead of retrying over TCP.
    #[serde(default)]
    pub ignore_truncation: bool,
}

impl UdpConfig {
    pub fn new(server: &str) -> Self {
        Self {
            server: join_host_port(server, DEFAULT_DNS_PORT),
            ipv4_only: false,
            ipv6_only: false,
            timeout_ms: default_timeout_ms(),
            udp_buf_size: DEFAULT_UDP_BUF_SIZE,
            ignore_truncation: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::from_flags(self.ipv4_only, self.ipv6_only)
    }

    pub fn recv_buf_size(&self) -> usize {
        self.udp_buf_size.max(MIN_UDP_BUF_SIZE) as usize
    }

    /// TCP settings used to replay a truncated response.
    pub fn tcp_fallback(&self) -> TcpConfig {
        TcpConfig {
            server: self.server.clone(),
            ipv4_only: self.ipv4_only,
            ipv6_only: self.ipv6_only,
            timeout_ms: self.timeout_ms,
            keep_open: false,
        }
    }
}

/// DNS over TCP port 53.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TcpConfig {
    pub server: String,

    #[serde(default)]
    pub ipv4_only: bool,

    #[serde(default)]
    pub ipv6_only: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Keep the connection open between exchanges.
    #[serde(default)]
    pub keep_open: bool,
}

impl TcpConfig {
    pub fn new(server: &str) -> Self {
        Self {
            server: join_host_port(server, DEFAULT_DNS_PORT),
            ipv4_only: false,
            ipv6_only: false,
            timeout_ms: default_timeout_ms(),
            keep_open: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::from_flags(self.ipv4_only, self.ipv6_only)
    }
}

/// DNS over TLS (RFC 7858).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    pub server: String,

    #[serde(default)]
    pub ipv4_only: bool,

    #[serde(default)]
    pub ipv6_only: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub keep_open: bool,

    /// Name to verify the server certificate against. Defaults to the host
    /// part of `server`.
    #[serde(default)]
    pub server_name: Option<String>,
}

impl TlsConfig {
    pub fn new(server: &str) -> Self {
        Self {
            server: join_host_port(server, DEFAULT_DOT_PORT),
            ipv4_only: false,
            ipv6_only: false,
            timeout_ms: default_timeout_ms(),
            keep_open: false,
            server_name: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::from_flags(self.ipv4_only, self.ipv6_only)
    }
}

/// DNS over HTTPS (RFC 8484).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpsConfig {
    pub url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Send queries as GET with a `dns=` parameter instead of POST.
    #[serde(default)]
    pub use_get: bool,

    /// Reuse one idle HTTP connection across exchanges.
    #[serde(default)]
    pub keep_open: bool,
}

impl HttpsConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            timeout_ms: default_timeout_ms(),
            use_get: false,
            keep_open: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_udp_buf_size() -> u16 {
    DEFAULT_UDP_BUF_SIZE
}
