//! Query construction and the CNAME-following exchange loop.

mod addresses;
mod dns_sd;

use crate::ports::DnsTransport;
use crate::records::{collect_records, edns, order_chain, AliasLink};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::CNAME;
use hickory_proto::rr::{Name, RecordType};
use resolv_domain::constants::DEFAULT_UDP_BUF_SIZE;
use resolv_domain::names::fqdn;
use resolv_domain::{ClientConfig, ResolveError};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::debug;

/// A DNS client: transport-independent query settings plus the transport
/// queries are sent over.
///
/// Settings may be changed between queries through [`Client::config_mut`].
/// To switch transports use [`Client::set_transport`], which closes the
/// current one first.
pub struct Client {
    config: ClientConfig,
    transport: Box<dyn DnsTransport>,
}

impl Client {
    pub fn new(config: ClientConfig, transport: Box<dyn DnsTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    pub fn protocol_name(&self) -> &'static str {
        self.transport.protocol_name()
    }

    /// Builds a query for `name` (fully qualified first) with the client's
    /// header flags and, when DO, NSID or a client subnet is configured, an
    /// EDNS0 OPT record.
    pub fn new_msg(&self, name: &str, qtype: RecordType) -> Result<Message, ResolveError> {
        let qname = Name::from_str(&fqdn(name)).map_err(|e| ResolveError::InvalidName {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let mut message = Message::new();
        message
            .set_id(fastrand::u16(..))
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(self.config.rd)
            .set_authentic_data(self.config.ad)
            .set_checking_disabled(self.config.cd);
        message.add_query(Query::query(qname, qtype));

        if self.config.uses_edns0() {
            edns::set_edns0(&mut message, DEFAULT_UDP_BUF_SIZE, self.config.dnssec_ok);
            if self.config.nsid {
                edns::add_nsid(&mut message);
            }
            if let Some(subnet) = &self.config.client_subnet {
                edns::add_client_subnet(&mut message, subnet);
            }
        }

        Ok(message)
    }

    /// Sends `request` and returns a response holding an answer of the
    /// requested type, following CNAME chains up to `max_cnames` times.
    ///
    /// Response-level failures carry the response that caused them. The
    /// caller's message is never modified; a follow rewrites a private copy.
    pub async fn exchange(&mut self, request: &Message) -> Result<Message, ResolveError> {
        let (mut qname, qtype) = match request.queries().first() {
            Some(query) => (query.name().clone(), query.query_type()),
            None => return Err(ResolveError::EmptyQuestion),
        };
        let max = self.config.max_cnames;
        let mut request = Cow::Borrowed(request);
        let mut attempt = 0u8;

        loop {
            debug!(
                qname = %qname,
                qtype = %qtype,
                protocol = self.transport.protocol_name(),
                attempt,
                "Sending query"
            );
            let response = self.transport.exchange(&request).await?;

            if response.response_code() != ResponseCode::NoError {
                debug!(qname = %qname, rcode = %response.response_code(), "Query failed");
                return Err(ResolveError::Rcode(Box::new(response)));
            }

            let answers = response.answers();
            if answers
                .iter()
                .any(|rr| rr.record_type() == qtype && rr.name() == &qname)
            {
                return Ok(response);
            }

            let mut chain = collect_records::<CNAME>(answers);
            if chain.is_empty() {
                return Err(ResolveError::NoData(Box::new(response)));
            }
            if !order_chain(&mut chain) || chain[0].owner() != &qname {
                return Err(ResolveError::InvalidCnames(Box::new(response)));
            }
            let target = chain[chain.len() - 1].target().clone();

            let mut typed = answers.iter().filter(|rr| rr.record_type() == qtype).peekable();
            if typed.peek().is_some() {
                if typed.any(|rr| rr.name() == &target) {
                    return Ok(response);
                }
                return Err(ResolveError::BadName(Box::new(response)));
            }

            if attempt >= max {
                return Err(ResolveError::MaxCnames {
                    max,
                    response: Box::new(response),
                });
            }
            attempt += 1;

            debug!(qname = %qname, target = %target, "Following CNAME chain");
            let mut next = target;
            next.set_fqdn(true);
            let copy = request.to_mut();
            let mut queries = copy.take_queries();
            if let Some(query) = queries.first_mut() {
                query.set_name(next.clone());
            }
            copy.add_queries(queries);
            qname = next;
        }
    }

    /// [`Client::new_msg`] followed by [`Client::exchange`].
    pub async fn lookup(&mut self, name: &str, qtype: RecordType) -> Result<Message, ResolveError> {
        let request = self.new_msg(name, qtype)?;
        self.exchange(&request).await
    }

    /// Releases any session the transport holds.
    pub async fn close(&mut self) -> Result<(), ResolveError> {
        self.transport.close().await?;
        Ok(())
    }

    /// Closes the current transport and switches to `transport`. The switch
    /// happens even when closing fails; the close error is still reported.
    pub async fn set_transport(
        &mut self,
        transport: Box<dyn DnsTransport>,
    ) -> Result<(), ResolveError> {
        let closed = self.transport.close().await;
        self.transport = transport;
        closed.map_err(ResolveError::from)
    }
}
