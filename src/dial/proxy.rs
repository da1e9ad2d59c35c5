//! Proxied dialing through HTTP CONNECT and SOCKS5 endpoints
//!
//! Handles establishing outbound connections through the configured
//! proxy endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;
use tokio_socks::tcp::Socks5Stream;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{format_tcp_addr, ProxyEndpoint, ProxyProtocol};
use crate::dial::{Dialer, Network};
use crate::error::{Result, TetherError};

/// Dials targets through a proxy endpoint.
///
/// The address family of the relayed connection is chosen by the
/// proxy server; the requested network is recorded for logging only.
#[derive(Debug, Clone)]
pub struct ProxyDialer {
    endpoint: ProxyEndpoint,
}

#[async_trait]
impl Dialer for ProxyDialer {
    async fn dial(
        &self,
        network: Network,
        addr: &str,
        deadline: Option<Duration>,
    ) -> Result<TcpStream> {
        match deadline {
            Some(budget) => time::timeout(budget, self.connect(network, addr))
                .await
                .map_err(|_| TetherError::Timeout)?,
            None => self.connect(network, addr).await,
        }
    }
}

impl ProxyDialer {
    pub fn new(endpoint: ProxyEndpoint) -> Self {
        Self { endpoint }
    }

    /// The endpoint this dialer routes through
    pub fn endpoint(&self) -> &ProxyEndpoint {
        &self.endpoint
    }

    #[instrument(skip(self), fields(proxy = %self.endpoint.addr(), network = %network))]
    async fn connect(&self, network: Network, addr: &str) -> Result<TcpStream> {
        let (host, port) = parse_host_port(addr)?;
        let proxy_addr = self.endpoint.addr();
        debug!(
            "Connecting to {} via {} proxy at {}",
            addr,
            self.endpoint.protocol.as_str(),
            proxy_addr
        );

        match self.endpoint.protocol {
            ProxyProtocol::Http => {
                connect_via_http_proxy(&self.endpoint, &proxy_addr, &host, port)
                    .await
                    .map_err(|e| {
                        TetherError::ProxyConnectionFailed(format!(
                            "HTTP proxy connect failed ({} -> {}): {}",
                            proxy_addr, addr, e
                        ))
                    })
            }
            ProxyProtocol::Socks5 => {
                connect_via_socks5_proxy(&self.endpoint, &proxy_addr, &host, port)
                    .await
                    .map_err(|e| {
                        TetherError::ProxyConnectionFailed(format!(
                            "SOCKS5 proxy connect failed ({} -> {}): {}",
                            proxy_addr, addr, e
                        ))
                    })
            }
        }
    }
}

async fn connect_via_http_proxy(
    endpoint: &ProxyEndpoint,
    proxy_addr: &str,
    target_host: &str,
    target_port: u16,
) -> std::result::Result<TcpStream, anyhow::Error> {
    let mut stream = TcpStream::connect(proxy_addr).await?;

    let authority = format_tcp_addr(target_host, target_port);
    let mut request = format!("CONNECT {} HTTP/1.1\r\nHost: {}\r\n", authority, authority);

    if let Some(username) = &endpoint.username {
        let password = endpoint.password.as_deref().unwrap_or("");
        let credentials = format!("{}:{}", username, password);
        request.push_str(&format!(
            "Proxy-Authorization: Basic {}\r\n",
            BASE64.encode(credentials.as_bytes())
        ));
    }

    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut response = vec![0u8; 1024];
    let n = stream.read(&mut response).await?;
    if n == 0 {
        anyhow::bail!("empty CONNECT response");
    }

    let response_str = String::from_utf8_lossy(&response[..n]);
    if !response_str.starts_with("HTTP/1.1 200") && !response_str.starts_with("HTTP/1.0 200") {
        anyhow::bail!(
            "CONNECT failed: {}",
            response_str.lines().next().unwrap_or("Unknown error")
        );
    }

    Ok(stream)
}

async fn connect_via_socks5_proxy(
    endpoint: &ProxyEndpoint,
    proxy_addr: &str,
    target_host: &str,
    target_port: u16,
) -> std::result::Result<TcpStream, anyhow::Error> {
    let socket = TcpStream::connect(proxy_addr).await?;

    let stream = match (&endpoint.username, &endpoint.password) {
        (Some(username), Some(password)) => {
            Socks5Stream::connect_with_password_and_socket(
                socket,
                (target_host, target_port),
                username,
                password,
            )
            .await?
        }
        _ => Socks5Stream::connect_with_socket(socket, (target_host, target_port)).await?,
    };

    Ok(stream.into_inner())
}

/// Split a `host:port` dial target, handling bracketed IPv6 literals
/// like `[::1]:8080` via URL parsing.
pub(crate) fn parse_host_port(addr: &str) -> Result<(String, u16)> {
    let url = Url::parse(&format!("http://{}", addr))
        .map_err(|e| TetherError::InvalidAddress(format!("'{}': {}", addr, e)))?;

    let host = url
        .host_str()
        .ok_or_else(|| TetherError::InvalidAddress(format!("'{}': missing host", addr)))?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    let port = url
        .port()
        .ok_or_else(|| TetherError::InvalidAddress(format!("'{}': missing port", addr)))?;

    Ok((host.to_string(), port))
}
