#![allow(dead_code)]

mod mock_transport;
mod records;

pub use mock_transport::{MockReply, MockTransport};
pub use records::*;
