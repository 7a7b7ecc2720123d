use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::str::FromStr;

pub fn query(name: &str, qtype: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(query_id(name))
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(name).unwrap(), qtype));
    message
}

// deterministic but name-dependent, so tests can tell queries apart
fn query_id(name: &str) -> u16 {
    name.bytes().fold(0x1234u16, |acc, b| acc.rotate_left(3) ^ u16::from(b))
}

/// A response echoing the query with one A record per address.
pub fn answer(request: &Message, addrs: &[&str]) -> Message {
    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true);
    response.add_queries(request.queries().to_vec());

    let owner = request.queries()[0].name().clone();
    for addr in addrs {
        response.add_answer(Record::from_rdata(
            owner.clone(),
            60,
            RData::A(A(addr.parse().unwrap())),
        ));
    }
    response
}

/// An empty response with the TC bit set.
pub fn truncated(request: &Message) -> Message {
    let mut response = answer(request, &[]);
    response.set_truncated(true);
    response
}
