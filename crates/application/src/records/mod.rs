pub mod cname_chain;
pub mod edns;
pub mod record_filter;

pub use cname_chain::{order_chain, AliasLink};
pub use record_filter::{collect_records, RecordKind, TypedRecord};
