//! Length-prefixed DNS over a byte stream (RFC 1035 §4.2.2) and the
//! optional persistent session shared by the TCP and TLS transports.

use super::{check_response_id, decode_response, encode_request};
use async_trait::async_trait;
use hickory_proto::op::Message;
use resolv_domain::TransportError;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Opens a fresh connection to one server.
#[async_trait]
pub trait Dialer: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn dial(&self) -> Result<Self::Stream, TransportError>;

    fn server(&self) -> &str;
}

/// A connection that, with `keep_open`, survives between exchanges.
///
/// A session that was reused and turns out to have been closed by the
/// server is replaced once by a fresh one. A failure on a fresh session is
/// never retried, and any failure drops the session.
pub struct StreamSession<D: Dialer> {
    dialer: D,
    timeout: Duration,
    keep_open: bool,
    stream: Option<D::Stream>,
}

impl<D: Dialer> StreamSession<D> {
    pub fn new(dialer: D, timeout: Duration, keep_open: bool) -> Self {
        Self {
            dialer,
            timeout,
            keep_open,
            stream: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn server(&self) -> &str {
        self.dialer.server()
    }

    pub fn dialer(&self) -> &D {
        &self.dialer
    }

    pub async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError> {
        let query = encode_request(request)?;
        let mut retried = false;

        loop {
            let (mut stream, reused) = match self.stream.take() {
                Some(stream) => (stream, true),
                None => (self.dialer.dial().await?, false),
            };

            match round_trip(&mut stream, &query, request, self.dialer.server(), self.timeout).await
            {
                Ok(response) => {
                    if self.keep_open {
                        self.stream = Some(stream);
                    }
                    return Ok(response);
                }
                Err(e) if e.is_connection_closed() && reused && !retried => {
                    debug!(server = %self.server(), "Reused connection closed by server, reconnecting");
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!(server = %self.server(), error = %e, "Error shutting down connection");
            }
        }
        Ok(())
    }
}

async fn round_trip<S>(
    stream: &mut S,
    query: &[u8],
    request: &Message,
    server: &str,
    timeout: Duration,
) -> Result<Message, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tokio::time::timeout(timeout, send_with_length_prefix(stream, query))
        .await
        .map_err(|_| TransportError::Timeout {
            server: server.to_string(),
            stage: "sending query to",
        })?
        .map_err(|e| stream_error(server, e))?;

    debug!(server = %server, message_len = query.len(), "Query sent");

    let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(stream))
        .await
        .map_err(|_| TransportError::Timeout {
            server: server.to_string(),
            stage: "waiting for response from",
        })?
        .map_err(|e| stream_error(server, e))?;

    debug!(server = %server, response_len = response_bytes.len(), "Response received");

    let response = decode_response(&response_bytes)?;
    check_response_id(server, request, &response)?;
    Ok(response)
}

/// End-of-stream and reset-like errors mean the server closed the
/// connection; everything else is a plain I/O failure.
pub(crate) fn stream_error(server: &str, e: io::Error) -> TransportError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TransportError::ConnectionClosed {
            server: server.to_string(),
        },
        _ => TransportError::Io {
            server: server.to_string(),
            reason: e.to_string(),
        },
    }
}

pub(crate) async fn send_with_length_prefix<S>(stream: &mut S, message: &[u8]) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let length = u16::try_from(message.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("DNS message too large: {} bytes", message.len()),
        )
    })?;

    let mut framed = Vec::with_capacity(2 + message.len());
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(message);

    stream.write_all(&framed).await?;
    stream.flush().await
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await?;
    Ok(response)
}
