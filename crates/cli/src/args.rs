use anyhow::Context;
use clap::Parser;
use hickory_proto::rr::RecordType;
use ipnetwork::IpNetwork;
use resolv_domain::{
    CliOverrides, ClientConfig, HttpsConfig, TcpConfig, TlsConfig, TransportConfig, UdpConfig,
};
use std::str::FromStr;

const DEFAULT_SERVER: &str = "127.0.0.1";

#[derive(Parser)]
#[command(name = "resolv")]
#[command(version)]
#[command(about = "Issue DNS queries over UDP, TCP, TLS or HTTPS")]
#[command(after_help = "Meta query types:\n  \
    @IPS          IPv4 and IPv6 addresses of QNAME\n  \
    @NAMESERVERS  nameservers of QNAME with their addresses\n  \
    @SERVICES     walk the DNS-SD tree of QNAME\n  \
    @PROBE        SRV lookups for every name in the service catalog\n  \
    @PTRPROBE     instance lookups for every name in the service catalog\n  \
    @NAPTR        NAPTR records of QNAME, decoded")]
pub struct Cli {
    /// Name to query
    pub qname: String,

    /// Record type, or one of the meta types listed below
    #[arg(default_value = "A")]
    pub qtype: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<String>,

    /// Server address, with optional port
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// Use TCP
    #[arg(long, conflicts_with_all = ["tls", "https"])]
    pub tcp: bool,

    /// Use DNS over TLS
    #[arg(long, conflicts_with = "https")]
    pub tls: bool,

    /// Name to verify the DoT certificate against
    #[arg(long, requires = "tls")]
    pub tls_server_name: Option<String>,

    /// Use DNS over HTTPS with this URL
    #[arg(long, value_name = "URL")]
    pub https: Option<String>,

    /// Send DoH queries with GET instead of POST
    #[arg(long, requires = "https")]
    pub get: bool,

    /// Use IPv4 only
    #[arg(short = '4', conflicts_with = "ipv6")]
    pub ipv4: bool,

    /// Use IPv6 only
    #[arg(short = '6')]
    pub ipv6: bool,

    /// Query timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// UDP receive buffer size
    #[arg(long)]
    pub bufsize: Option<u16>,

    /// Return truncated UDP responses instead of retrying over TCP
    #[arg(long)]
    pub ignore: bool,

    /// Set the AD bit
    #[arg(long)]
    pub ad: bool,

    /// Set the CD bit
    #[arg(long)]
    pub cd: bool,

    /// Set the DO bit (adds an EDNS0 OPT record)
    #[arg(long = "do")]
    pub dnssec_ok: bool,

    /// Clear the RD bit
    #[arg(long)]
    pub norec: bool,

    /// Request the server's NSID
    #[arg(long)]
    pub nsid: bool,

    /// Send an EDNS0 client subnet, e.g. 192.0.2.0/24
    #[arg(long, value_name = "PREFIX")]
    pub subnet: Option<IpNetwork>,

    /// Follow up to N CNAMEs
    #[arg(long, value_name = "N")]
    pub max_cnames: Option<u8>,

    /// File with one service name per line, for @PROBE and @PTRPROBE
    #[arg(long, value_name = "FILE")]
    pub services_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Ips,
    Nameservers,
    Services,
    Probe,
    PtrProbe,
    Naptr,
    Record(RecordType),
}

impl Cli {
    pub fn query_kind(&self) -> anyhow::Result<QueryKind> {
        let kind = match self.qtype.to_ascii_uppercase().as_str() {
            "@IPS" => QueryKind::Ips,
            "@NAMESERVERS" => QueryKind::Nameservers,
            "@SERVICES" => QueryKind::Services,
            "@PROBE" => QueryKind::Probe,
            "@PTRPROBE" => QueryKind::PtrProbe,
            "@NAPTR" => QueryKind::Naptr,
            other => QueryKind::Record(
                RecordType::from_str(other)
                    .with_context(|| format!("unknown query type '{}'", self.qtype))?,
            ),
        };
        Ok(kind)
    }

    /// Command-line flags, each section only when a flag touching it was
    /// given so a config file keeps its values otherwise.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            client: self.client_override(),
            transport: self.transport_override(),
            log_level: self.log_level.clone(),
            service_file: self.services_file.clone(),
        }
    }

    fn client_override(&self) -> Option<ClientConfig> {
        let touched = self.ad
            || self.cd
            || self.dnssec_ok
            || self.norec
            || self.nsid
            || self.subnet.is_some()
            || self.max_cnames.is_some();
        if !touched {
            return None;
        }

        Some(ClientConfig {
            ad: self.ad,
            cd: self.cd,
            dnssec_ok: self.dnssec_ok,
            rd: !self.norec,
            client_subnet: self.subnet,
            nsid: self.nsid,
            max_cnames: self.max_cnames.unwrap_or_default(),
        })
    }

    fn transport_override(&self) -> Option<TransportConfig> {
        let touched = self.server.is_some()
            || self.tcp
            || self.tls
            || self.https.is_some()
            || self.ipv4
            || self.ipv6
            || self.timeout_ms.is_some()
            || self.bufsize.is_some()
            || self.ignore;
        if !touched {
            return None;
        }

        let server = self.server.as_deref().unwrap_or(DEFAULT_SERVER);
        let mut transport = if let Some(url) = &self.https {
            let mut c = HttpsConfig::new(url);
            c.use_get = self.get;
            TransportConfig::Https(c)
        } else if self.tls {
            let mut c = TlsConfig::new(server);
            c.ipv4_only = self.ipv4;
            c.ipv6_only = self.ipv6;
            c.server_name = self.tls_server_name.clone();
            TransportConfig::Tls(c)
        } else if self.tcp {
            let mut c = TcpConfig::new(server);
            c.ipv4_only = self.ipv4;
            c.ipv6_only = self.ipv6;
            TransportConfig::Tcp(c)
        } else {
            let mut c = UdpConfig::new(server);
            c.ipv4_only = self.ipv4;
            c.ipv6_only = self.ipv6;
            c.ignore_truncation = self.ignore;
            if let Some(size) = self.bufsize {
                c.udp_buf_size = size;
            }
            TransportConfig::Udp(c)
        };

        if let Some(ms) = self.timeout_ms {
            match &mut transport {
                TransportConfig::Udp(c) => c.timeout_ms = ms,
                TransportConfig::Tcp(c) => c.timeout_ms = ms,
                TransportConfig::Tls(c) => c.timeout_ms = ms,
                TransportConfig::Https(c) => c.timeout_ms = ms,
            }
        }
        Some(transport)
    }
}
