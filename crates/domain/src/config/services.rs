use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Well-known `<service>.<proto>` names probed with SRV lookups.
pub const DEFAULT_SERVICE_NAMES: &[&str] = &[
    "_afpovertcp._tcp",
    "_autodiscover._tcp",
    "_avaya-ep-config._tcp",
    "_caldav._tcp",
    "_caldavs._tcp",
    "_carddav._tcp",
    "_carddavs._tcp",
    "_cisco-uds._tcp",
    "_collab-edge._tls",
    "_cuplogin._tcp",
    "_ftp._tcp",
    "_h323cs._tcp",
    "_h323ls._udp",
    "_h323rs._udp",
    "_http._tcp",
    "_https._tcp",
    "_iax._tcp",
    "_imap._tcp",
    "_imaps._tcp",
    "_informacast._tcp",
    "_informacastpg._tls",
    "_ipp._tcp",
    "_ipp._tcp.pc-printer-discovery",
    "_ipp._tls.pc-printer-discovery",
    "_ipps._tcp",
    "_ipps._tcp.pc-printer-discovery",
    "_ipps._tls.pc-printer-discovery",
    "_jabber._tcp",
    "_kerberos._tcp",
    "_kerberos._udp",
    "_ldap._tcp",
    "_ldap._tcp.dc._msdcs",
    "_ldaps._tcp",
    "_minecraft._tcp",
    "_mongodb._tcp",
    "_mysql._tcp",
    "_mysqlx._tcp",
    "_net-assistant._udp",
    "_nfs._tcp",
    "_nssocketport._tcp",
    "_ocsp._tcp",
    "_opcua._tcp",
    "_opcua._tls",
    "_pexapp._tcp",
    "_plexclient._tcp",
    "_plexmediasvr._tcp",
    "_pcoip-bootstrap._tcp",
    "_pop3._tcp",
    "_pop3s._tcp",
    "_postgresql._tcp",
    "_printer._tcp",
    "_pkixrep._tcp",
    "_sftp-ssh._tcp",
    "_sip._tcp",
    "_sips._tcp",
    "_sip._tls",
    "_sip._udp",
    "_sipfederationtls._tcp",
    "_skype._tcp",
    "_smb._tcp",
    "_smtp._tcp",
    "_ssh._tcp",
    "_stun._tcp",
    "_submission._tcp",
    "_submissions._tcp",
    "_xmpp-client._tcp",
    "_xmpps-client._tcp",
    "_xmpp-server._tcp",
    "_xmpps-server._tcp",
    "_xmpp._tcp",
    "_x-puppet._tcp",
];

/// The list of service names SRV probing walks. Passed explicitly so
/// concurrent probes never share mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceCatalog {
    #[serde(default = "default_names")]
    pub names: Vec<String>,
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self {
            names: default_names(),
        }
    }
}

impl ServiceCatalog {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Loads one service name per line; blank lines are skipped.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        let names: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            return Err(ConfigError::EmptyServiceFile(path.to_string()));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

fn default_names() -> Vec<String> {
    DEFAULT_SERVICE_NAMES.iter().map(|s| s.to_string()).collect()
}
