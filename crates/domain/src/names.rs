//! Helpers for domain-name strings and `host:port` server addresses.

use std::net::IpAddr;

/// Fully qualifies `name` by appending the root label if it is missing.
pub fn fqdn(name: &str) -> String {
    let qualified = match name.strip_suffix('.') {
        // an odd run of backslashes escapes the final dot
        Some(rest) => rest.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 0,
        None => false,
    };
    if qualified {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Splits a presentation-format domain name into its labels, honoring
/// backslash escapes (so `My\.Printer` stays one label). The root label is
/// not returned.
pub fn split_labels(name: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in name.chars() {
        if escaped {
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            current.push(c);
            escaped = true;
        } else if c == '.' {
            if !current.is_empty() {
                labels.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        labels.push(current);
    }
    labels
}

pub(crate) fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        // a bare IPv6 literal also contains ':'
        if host.contains(':') {
            return None;
        }
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

/// Returns `server` unchanged if it already carries a port, otherwise joins
/// it with `default_port` (bracketing IPv6 literals).
pub fn join_host_port(server: &str, default_port: u16) -> String {
    if parse_host_port(server).is_some() {
        return server.to_string();
    }
    let host = server.trim_start_matches('[').trim_end_matches(']');
    if host.parse::<IpAddr>().is_ok_and(|ip| ip.is_ipv6()) {
        format!("[{}]:{}", host, default_port)
    } else {
        format!("{}:{}", host, default_port)
    }
}

/// The host part of a `host:port` server address, without IPv6 brackets.
pub fn host_part(server: &str) -> &str {
    match parse_host_port(server) {
        Some((host, _)) => host,
        None => server.trim_start_matches('[').trim_end_matches(']'),
    }
}
