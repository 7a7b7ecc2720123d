//! resolv domain layer: error taxonomy, configuration and result types
pub mod config;
pub mod constants;
pub mod errors;
pub mod names;
pub mod service_discovery;

pub use config::{
    AddressFamily, CliOverrides, ClientConfig, Config, ConfigError, HttpsConfig, LoggingConfig,
    ServiceCatalog, TcpConfig, TlsConfig, TransportConfig, UdpConfig,
};
pub use errors::{ResolveError, TransportError};
pub use service_discovery::{
    InstanceName, NaptrRecord, Nameserver, ServiceDiscovery, ServiceInstanceInfo,
};
