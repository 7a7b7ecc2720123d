//! DNS-over-HTTPS transport (RFC 8484)
//!
//! Queries go out with ID 0, either as a POST body or base64url-encoded in
//! the `dns` parameter of a GET.
//!
//! ```text
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use super::{decode_response, encode_request};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hickory_proto::op::Message;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use resolv_application::DnsTransport;
use resolv_domain::constants::DNS_MESSAGE_CONTENT_TYPE;
use resolv_domain::{HttpsConfig, TransportError};
use std::sync::Arc;
use tracing::debug;

pub struct HttpsTransport {
    config: HttpsConfig,
    tls_config: Option<Arc<rustls::ClientConfig>>,
    client: Option<reqwest::Client>,
}

impl HttpsTransport {
    pub fn new(config: HttpsConfig) -> Self {
        Self {
            config,
            tls_config: None,
            client: None,
        }
    }

    /// Uses `tls_config` for the HTTPS connection instead of the webpki roots.
    pub fn with_tls_config(config: HttpsConfig, tls_config: Arc<rustls::ClientConfig>) -> Self {
        Self {
            tls_config: Some(tls_config),
            ..Self::new(config)
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// The kept client when `keep_open` is set, otherwise a fresh one that
    /// holds no idle connection.
    fn http_client(&mut self) -> Result<reqwest::Client, TransportError> {
        if self.config.keep_open {
            if let Some(client) = &self.client {
                return Ok(client.clone());
            }
        }

        let builder = reqwest::Client::builder()
            .timeout(self.config.timeout())
            .pool_max_idle_per_host(if self.config.keep_open { 1 } else { 0 });
        let builder = match &self.tls_config {
            Some(tls) => builder.use_preconfigured_tls(rustls::ClientConfig::clone(tls)),
            None => builder.use_rustls_tls(),
        };
        let client = builder
            .build()
            .map_err(|e| TransportError::InvalidConfig(format!("HTTP client: {}", e)))?;

        if self.config.keep_open {
            self.client = Some(client.clone());
        }
        Ok(client)
    }

    fn http_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                server: self.config.url.clone(),
                stage: "waiting for response from",
            }
        } else {
            TransportError::Http {
                url: self.config.url.clone(),
                reason: e.to_string(),
            }
        }
    }
}

/// `url` with the base64url (unpadded) query appended as the `dns` parameter.
pub fn get_url(url: &str, query: &[u8]) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}dns={}", url, separator, URL_SAFE_NO_PAD.encode(query))
}

#[async_trait]
impl DnsTransport for HttpsTransport {
    async fn exchange(&mut self, request: &Message) -> Result<Message, TransportError> {
        let client = self.http_client()?;

        let mut query = request.clone();
        query.set_id(0);
        let body = encode_request(&query)?;

        debug!(
            url = %self.config.url,
            message_len = body.len(),
            get = self.config.use_get,
            "Sending DoH query"
        );

        let http_request = if self.config.use_get {
            client
                .get(get_url(&self.config.url, &body))
                .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
        } else {
            client
                .post(&self.config.url)
                .header(CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
                .header(ACCEPT, DNS_MESSAGE_CONTENT_TYPE)
                .body(body)
        };

        let response = http_request.send().await.map_err(|e| self.http_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::HttpStatus {
                url: self.config.url.clone(),
                status: status.as_u16(),
            });
        }

        let response_bytes = response.bytes().await.map_err(|e| self.http_error(e))?;

        debug!(
            url = %self.config.url,
            response_len = response_bytes.len(),
            "DoH response received"
        );

        decode_response(&response_bytes)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.client = None;
        Ok(())
    }

    fn protocol_name(&self) -> &'static str {
        "HTTPS"
    }
}
