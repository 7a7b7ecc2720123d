use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use resolv_application::DnsTransport;
use resolv_domain::names::fqdn;
use resolv_domain::TransportError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Scripted response sections for one `(name, type)` pair.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub rcode: ResponseCode,
    pub answers: Vec<Record>,
    pub name_servers: Vec<Record>,
    pub additionals: Vec<Record>,
}

impl MockReply {
    pub fn answers(answers: Vec<Record>) -> Self {
        Self {
            rcode: ResponseCode::NoError,
            answers,
            name_servers: vec![],
            additionals: vec![],
        }
    }

    pub fn rcode(rcode: ResponseCode) -> Self {
        Self {
            rcode,
            ..Self::answers(vec![])
        }
    }

    pub fn with_additionals(mut self, additionals: Vec<Record>) -> Self {
        self.additionals = additionals;
        self
    }

    pub fn with_name_servers(mut self, name_servers: Vec<Record>) -> Self {
        self.name_servers = name_servers;
        self
    }
}

/// In-memory transport answering from a script. Clones share state, so a
/// test can keep one handle after boxing another into a `Client`.
///
/// Queries without a scripted reply are answered with NXDOMAIN.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<RwLock<HashMap<(String, RecordType), MockReply>>>,
    errors: Arc<RwLock<HashMap<(String, RecordType), TransportError>>>,
    queries: Arc<Mutex<Vec<Message>>>,
    closes: Arc<AtomicUsize>,
}

fn key(name: &str, qtype: RecordType) -> (String, RecordType) {
    (fqdn(name).to_ascii_lowercase(), qtype)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn DnsTransport> {
        Box::new(self.clone())
    }

    pub async fn set_reply(&self, name: &str, qtype: RecordType, reply: MockReply) {
        self.replies.write().await.insert(key(name, qtype), reply);
    }

    pub async fn set_answers(&self, name: &str, qtype: RecordType, answers: Vec<Record>) {
        self.set_reply(name, qtype, MockReply::answers(answers)).await;
    }

    pub async fn set_error(&self, name: &str, qtype: RecordType, error: TransportError) {
        self.errors.write().await.insert(key(name, qtype), error);
    }

    pub fn recorded_queries(&self) -> Vec<Message> {
        self.queries.lock().unwrap().clone()
    }

    /// `(qname, qtype)` of every query sent, in order.
    pub fn queried(&self) -> Vec<(String, RecordType)> {
        self.recorded_queries()
            .iter()
            .map(|m| {
                let q = &m.queries()[0];
                (q.name().to_string(), q.query_type())
            })
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError> {
        self.queries.lock().unwrap().push(request.clone());

        let query = request.queries()[0].clone();
        let k = key(&query.name().to_string(), query.query_type());

        if let Some(error) = self.errors.read().await.get(&k) {
            return Err(error.clone());
        }

        let reply = self
            .replies
            .read()
            .await
            .get(&k)
            .cloned()
            .unwrap_or_else(|| MockReply::rcode(ResponseCode::NXDomain));

        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true)
            .set_response_code(reply.rcode);
        response.add_query(query);
        response.add_answers(reply.answers);
        response.add_name_servers(reply.name_servers);
        response.add_additionals(reply.additionals);
        Ok(response)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn protocol_name(&self) -> &'static str {
        "MOCK"
    }
}
