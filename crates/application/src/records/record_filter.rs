//! Typed views over the records of a message section.

use hickory_proto::rr::rdata::{A, AAAA, CAA, CNAME, HTTPS, MX, NAPTR, NS, PTR, SOA, SRV, SVCB, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType};

/// Record data that can be picked out of a mixed section.
pub trait RecordKind {
    const RECORD_TYPE: RecordType;

    fn from_rdata(rdata: &RData) -> Option<&Self>;
}

macro_rules! record_kind {
    ($($kind:ident),* $(,)?) => {
        $(
            impl RecordKind for $kind {
                const RECORD_TYPE: RecordType = RecordType::$kind;

                fn from_rdata(rdata: &RData) -> Option<&Self> {
                    match rdata {
                        RData::$kind(data) => Some(data),
                        _ => None,
                    }
                }
            }
        )*
    };
}

record_kind!(A, AAAA, CAA, CNAME, HTTPS, MX, NAPTR, NS, PTR, SOA, SRV, SVCB, TXT);

/// A record of kind `K`, borrowed from its message.
#[derive(Debug)]
pub struct TypedRecord<'a, K> {
    pub name: &'a Name,
    pub ttl: u32,
    pub data: &'a K,
}

impl<K> Clone for TypedRecord<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for TypedRecord<'_, K> {}

/// Returns every record in `records` whose data is of kind `K`, in section
/// order. Records of other types are skipped.
pub fn collect_records<K: RecordKind>(records: &[Record]) -> Vec<TypedRecord<'_, K>> {
    records
        .iter()
        .filter(|record| record.record_type() == K::RECORD_TYPE)
        .filter_map(|record| {
            let data = record.data().and_then(K::from_rdata)?;
            Some(TypedRecord {
                name: record.name(),
                ttl: record.ttl(),
                data,
            })
        })
        .collect()
}
