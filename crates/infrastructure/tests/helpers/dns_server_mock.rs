use hickory_proto::op::Message;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;
use tokio_rustls::TlsAcceptor;

/// Builds the reply to one query; `None` means stay silent.
pub type Handler = Arc<dyn Fn(&Message) -> Option<Message> + Send + Sync>;

pub fn reply<F>(f: F) -> Handler
where
    F: Fn(&Message) -> Message + Send + Sync + 'static,
{
    Arc::new(move |request: &Message| Some(f(request)))
}

pub fn silent() -> Handler {
    Arc::new(|_: &Message| None)
}

pub struct MockUdpServer {
    addr: SocketAddr,
    queries: Arc<Mutex<Vec<Vec<u8>>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUdpServer {
    pub async fn start(handler: Handler) -> Self {
        Self::start_on(SocketAddr::from(([127, 0, 0, 1], 0)), handler).await
    }

    pub async fn start_on(addr: SocketAddr, handler: Handler) -> Self {
        let socket = UdpSocket::bind(addr).await.unwrap();
        let local_addr = socket.local_addr().unwrap();
        let queries = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let recorded = queries.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            recorded.lock().unwrap().push(buf[..len].to_vec());
                            let Ok(request) = Message::from_vec(&buf[..len]) else {
                                continue;
                            };
                            if let Some(response) = handler(&request) {
                                let _ = socket.send_to(&response.to_vec().unwrap(), peer).await;
                            }
                        }
                    }
                }
            }
        });

        Self {
            addr: local_addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries(&self) -> Vec<Vec<u8>> {
        self.queries.lock().unwrap().clone()
    }
}

impl Drop for MockUdpServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// What a stream server does with one accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPlan {
    /// Answer this many queries, then close.
    Answer(usize),
    /// Close right after accepting (and, for TLS, the handshake).
    Close,
    /// Read queries but never answer.
    Hang,
}

/// Plan for the n-th accepted connection, counting from 0.
pub type Plan = Arc<dyn Fn(usize) -> ConnectionPlan + Send + Sync>;

pub fn every_connection(plan: ConnectionPlan) -> Plan {
    Arc::new(move |_: usize| plan)
}

pub fn first_then(first: ConnectionPlan, rest: ConnectionPlan) -> Plan {
    Arc::new(move |n: usize| if n == 0 { first } else { rest })
}

/// TCP or TLS DNS server with per-connection behavior.
pub struct MockStreamServer {
    addr: SocketAddr,
    accepts: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<Vec<u8>>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockStreamServer {
    pub async fn start_tcp(plan: Plan, handler: Handler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::start_with(listener, None, plan, handler)
    }

    pub async fn start_tls(acceptor: TlsAcceptor, plan: Plan, handler: Handler) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::start_with(listener, Some(acceptor), plan, handler)
    }

    pub fn start_with(
        listener: TcpListener,
        acceptor: Option<TlsAcceptor>,
        plan: Plan,
        handler: Handler,
    ) -> Self {
        let addr = listener.local_addr().unwrap();
        let accepts = Arc::new(AtomicUsize::new(0));
        let queries = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let accepted = accepts.clone();
        let recorded = queries.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = listener.accept() => {
                        let Ok((socket, _)) = result else {
                            continue;
                        };
                        let connection_plan = plan(accepted.fetch_add(1, Ordering::SeqCst));
                        let handler = handler.clone();
                        let recorded = recorded.clone();
                        let acceptor = acceptor.clone();

                        tokio::spawn(async move {
                            match acceptor {
                                Some(acceptor) => {
                                    if let Ok(stream) = acceptor.accept(socket).await {
                                        serve(stream, connection_plan, handler, recorded).await;
                                    }
                                }
                                None => serve(socket, connection_plan, handler, recorded).await,
                            }
                        });
                    }
                }
            }
        });

        Self {
            addr,
            accepts,
            queries,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn accepts(&self) -> usize {
        self.accepts.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<Vec<u8>> {
        self.queries.lock().unwrap().clone()
    }
}

impl Drop for MockStreamServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve<S>(
    mut stream: S,
    plan: ConnectionPlan,
    handler: Handler,
    recorded: Arc<Mutex<Vec<Vec<u8>>>>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match plan {
        ConnectionPlan::Close => {}
        ConnectionPlan::Hang => {
            let mut buf = [0u8; 512];
            while let Ok(n) = stream.read(&mut buf).await {
                if n == 0 {
                    break;
                }
            }
        }
        ConnectionPlan::Answer(count) => {
            for _ in 0..count {
                let Some(query) = read_frame(&mut stream).await else {
                    break;
                };
                recorded.lock().unwrap().push(query.clone());
                let Ok(request) = Message::from_vec(&query) else {
                    break;
                };
                if let Some(response) = handler(&request) {
                    if write_frame(&mut stream, &response.to_vec().unwrap())
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
    }
    let _ = stream.shutdown().await;
}

async fn read_frame<S: AsyncRead + Unpin>(stream: &mut S) -> Option<Vec<u8>> {
    let mut len = [0u8; 2];
    stream.read_exact(&mut len).await.ok()?;
    let mut frame = vec![0u8; u16::from_be_bytes(len) as usize];
    stream.read_exact(&mut frame).await.ok()?;
    Some(frame)
}

async fn write_frame<S: AsyncWrite + Unpin>(stream: &mut S, message: &[u8]) -> std::io::Result<()> {
    stream.write_all(&(message.len() as u16).to_be_bytes()).await?;
    stream.write_all(message).await?;
    stream.flush().await
}

/// A self-signed certificate for `localhost`: the server side acceptor and a
/// client config that trusts only that certificate.
pub fn localhost_tls() -> (TlsAcceptor, Arc<rustls::ClientConfig>) {
    let rcgen::CertifiedKey { cert, key_pair } =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_der: CertificateDer<'static> = cert.der().clone();
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

    let server_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert_der.clone()], key_der)
        .unwrap();

    let mut roots = rustls::RootCertStore::empty();
    roots.add(cert_der).unwrap();
    let client_config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    (
        TlsAcceptor::from(Arc::new(server_config)),
        Arc::new(client_config),
    )
}
