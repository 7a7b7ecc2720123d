use hickory_proto::op::Message;
use thiserror::Error;

/// Failures of a single wire exchange: sockets, TLS, HTTP and message codec.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("Failed to resolve DNS server address {server}: {reason}")]
    Resolve { server: String, reason: String },

    #[error("Failed to connect to DNS server {server}: {reason}")]
    Connect { server: String, reason: String },

    #[error("TLS handshake with {server} failed: {reason}")]
    Tls { server: String, reason: String },

    #[error("Timeout {stage} {server}")]
    Timeout { server: String, stage: &'static str },

    #[error("Connection closed by {server}")]
    ConnectionClosed { server: String },

    #[error("I/O error talking to {server}: {reason}")]
    Io { server: String, reason: String },

    #[error("Failed to encode DNS message: {0}")]
    Encode(String),

    #[error("Failed to decode DNS response: {0}")]
    Decode(String),

    #[error("Response ID {received} does not match query ID {expected} from {server}")]
    IdMismatch {
        server: String,
        expected: u16,
        received: u16,
    },

    #[error("DoH request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("DoH server {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid transport configuration: {0}")]
    InvalidConfig(String),
}

impl TransportError {
    /// The peer closed the connection instead of answering.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, TransportError::ConnectionClosed { .. })
    }
}

/// Outcome of resolving one query, including response-level conditions.
///
/// Response-level variants keep the offending response so callers can
/// inspect it (see [`ResolveError::response`]).
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid domain name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Query message has no question")]
    EmptyQuestion,

    #[error("Response rcode is not success ({})", .0.response_code())]
    Rcode(Box<Message>),

    #[error("Response has a NODATA pseudo RCODE")]
    NoData(Box<Message>),

    #[error("Response contains an invalid CNAME chain")]
    InvalidCnames(Box<Message>),

    #[error("Response has an answer that matches neither the qname nor one of its aliases")]
    BadName(Box<Message>),

    #[error("Response has an answer whose data does not conform to the RR type")]
    BadData,

    #[error("Query followed the maximum number of CNAMEs ({max})")]
    MaxCnames { max: u8, response: Box<Message> },

    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ResolveError>),
}

impl ResolveError {
    /// The response that produced a response-level failure, if any.
    pub fn response(&self) -> Option<&Message> {
        match self {
            ResolveError::Rcode(response)
            | ResolveError::NoData(response)
            | ResolveError::InvalidCnames(response)
            | ResolveError::BadName(response)
            | ResolveError::MaxCnames { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ResolveError::Transport(_))
    }

    /// Collapses a list of errors the way callers expect: a single error is
    /// returned as-is, several are wrapped in [`ResolveError::Multiple`].
    pub fn join(mut errors: Vec<ResolveError>) -> ResolveError {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            ResolveError::Multiple(errors)
        }
    }
}
