//! EDNS0 (RFC 6891) OPT record and option builders.

use hickory_proto::op::{Edns, Message};
use hickory_proto::rr::rdata::opt::{EdnsCode, EdnsOption};
use ipnetwork::IpNetwork;
use resolv_domain::constants::DEFAULT_UDP_BUF_SIZE;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

const FAMILY_IPV4: u16 = 1;
const FAMILY_IPV6: u16 = 2;

/// Returns the message's OPT record, adding one first if there is none.
pub fn ensure_opt(message: &mut Message) -> &mut Edns {
    message.extensions_mut().get_or_insert_with(|| {
        let mut edns = Edns::new();
        edns.set_max_payload(DEFAULT_UDP_BUF_SIZE);
        edns
    })
}

/// Sets the advertised UDP payload size and the DO bit.
pub fn set_edns0(message: &mut Message, udp_payload: u16, dnssec_ok: bool) {
    let edns = ensure_opt(message);
    edns.set_max_payload(udp_payload);
    edns.set_dnssec_ok(dnssec_ok);
}

/// Requests the server identifier (RFC 5001) with an empty NSID option.
pub fn add_nsid(message: &mut Message) {
    ensure_opt(message)
        .options_mut()
        .insert(EdnsOption::Unknown(u16::from(EdnsCode::NSID), Vec::new()));
}

/// Adds a Client Subnet option (RFC 7871) with scope prefix 0.
pub fn add_client_subnet(message: &mut Message, subnet: &IpNetwork) {
    ensure_opt(message).options_mut().insert(EdnsOption::Unknown(
        u16::from(EdnsCode::Subnet),
        encode_client_subnet(subnet),
    ));
}

/// Option payload: FAMILY, SOURCE PREFIX-LENGTH, SCOPE PREFIX-LENGTH, then
/// the address masked to the prefix and cut to `ceil(prefix / 8)` bytes.
pub fn encode_client_subnet(subnet: &IpNetwork) -> Vec<u8> {
    let prefix = subnet.prefix();
    let (family, address) = match subnet {
        IpNetwork::V4(net) => (FAMILY_IPV4, net.network().octets().to_vec()),
        IpNetwork::V6(net) => (FAMILY_IPV6, net.network().octets().to_vec()),
    };
    let len = (usize::from(prefix) + 7) / 8;

    let mut payload = Vec::with_capacity(4 + len);
    payload.extend_from_slice(&family.to_be_bytes());
    payload.push(prefix);
    payload.push(0);
    payload.extend_from_slice(&address[..len]);
    payload
}

/// Reads back a Client Subnet payload as `(source prefix, scope prefix, address)`.
pub fn decode_client_subnet(payload: &[u8]) -> Option<(u8, u8, IpAddr)> {
    if payload.len() < 4 {
        return None;
    }
    let (header, address) = payload.split_at(4);
    let family = u16::from_be_bytes([header[0], header[1]]);
    let (source, scope) = (header[2], header[3]);

    let ip = match family {
        FAMILY_IPV4 if address.len() <= 4 => {
            let mut octets = [0u8; 4];
            octets[..address.len()].copy_from_slice(address);
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        FAMILY_IPV6 if address.len() <= 16 => {
            let mut octets = [0u8; 16];
            octets[..address.len()].copy_from_slice(address);
            IpAddr::V6(Ipv6Addr::from(octets))
        }
        _ => return None,
    };
    Some((source, scope, ip))
}
