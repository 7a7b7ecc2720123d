pub mod client;
pub mod errors;
pub mod logging;
pub mod root;
pub mod services;
pub mod transport;

pub use client::ClientConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use services::{ServiceCatalog, DEFAULT_SERVICE_NAMES};
pub use transport::{AddressFamily, HttpsConfig, TcpConfig, TlsConfig, TransportConfig, UdpConfig};
