use super::errors::ConfigError;
use crate::constants::MAX_MAX_CNAMES;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

/// Query settings that are independent of the transport.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Set the AD (authentic data) bit in queries. Only meaningful in
    /// responses, where it reports that the server validated the answer.
    #[serde(default)]
    pub ad: bool,

    /// Set the CD (checking disabled) bit in queries.
    #[serde(default)]
    pub cd: bool,

    /// Set the DO (DNSSEC OK) bit in the EDNS0 OPT record.
    #[serde(default, rename = "do")]
    pub dnssec_ok: bool,

    /// Set the RD (recursion desired) bit in queries.
    #[serde(default = "default_true")]
    pub rd: bool,

    /// Send an EDNS0 Client Subnet option (RFC 7871). A zero-length prefix
    /// asks resolvers not to add the option on the client's behalf.
    #[serde(default)]
    pub client_subnet: Option<IpNetwork>,

    /// Request the server's identifier (RFC 5001).
    #[serde(default)]
    pub nsid: bool,

    /// How many times a lookup may re-issue the query for the last target
    /// of a CNAME chain. Zero disables following.
    #[serde(default)]
    pub max_cnames: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ad: false,
            cd: false,
            dnssec_ok: false,
            rd: true,
            client_subnet: None,
            nsid: false,
            max_cnames: 0,
        }
    }
}

impl ClientConfig {
    pub fn uses_edns0(&self) -> bool {
        self.dnssec_ok || self.nsid || self.client_subnet.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cnames > MAX_MAX_CNAMES {
            return Err(ConfigError::Validation(format!(
                "max_cnames must be at most {}, got {}",
                MAX_MAX_CNAMES, self.max_cnames
            )));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
