use hickory_proto::rr::rdata::{A, AAAA, CNAME, NAPTR, NS, PTR, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record};
use resolv_domain::names::fqdn;
use std::str::FromStr;

/// Fully qualified, the way names come off the wire.
pub fn name(s: &str) -> Name {
    Name::from_str(&fqdn(s)).unwrap()
}

/// A name without the root label, as a sloppy transport might hand back.
pub fn relative_name(s: &str) -> Name {
    Name::from_str(s.trim_end_matches('.')).unwrap()
}

pub fn a(owner: &str, ip: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::A(A(ip.parse().unwrap())))
}

pub fn aaaa(owner: &str, ip: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::AAAA(AAAA(ip.parse().unwrap())))
}

pub fn cname(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::CNAME(CNAME(name(target))))
}

pub fn ns(owner: &str, server: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::NS(NS(name(server))))
}

pub fn ptr(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 300, RData::PTR(PTR(name(target))))
}

pub fn srv(owner: &str, priority: u16, weight: u16, port: u16, target: &str) -> Record {
    Record::from_rdata(
        name(owner),
        300,
        RData::SRV(SRV::new(priority, weight, port, name(target))),
    )
}

pub fn naptr(
    owner: &str,
    order: u16,
    preference: u16,
    flags: &str,
    services: &str,
    replacement: &str,
) -> Record {
    let bytes = |s: &str| s.as_bytes().to_vec().into_boxed_slice();
    Record::from_rdata(
        name(owner),
        300,
        RData::NAPTR(NAPTR::new(
            order,
            preference,
            bytes(flags),
            bytes(services),
            bytes(""),
            name(replacement),
        )),
    )
}

pub fn txt(owner: &str, strings: &[&str]) -> Record {
    Record::from_rdata(
        name(owner),
        300,
        RData::TXT(TXT::new(strings.iter().map(|s| s.to_string()).collect())),
    )
}

pub fn soa(owner: &str, mname: &str) -> Record {
    Record::from_rdata(
        name(owner),
        300,
        RData::SOA(SOA::new(
            name(mname),
            name(&format!("hostmaster.{}", owner)),
            2024010101,
            7200,
            3600,
            1209600,
            300,
        )),
    )
}
