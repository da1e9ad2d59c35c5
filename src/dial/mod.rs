//! Outbound dialing with proxy fallback
//!
//! This module provides the dial layer used to reach peers:
//! - direct TCP dialing with network-family selection
//! - dialing through a configured HTTP CONNECT or SOCKS5 proxy
//! - transparent fallback from the proxy path to the direct path
//! - per-attempt dial deadlines

mod direct;
mod fallback;
mod proxy;
mod resolver;

pub use direct::DirectDialer;
pub use fallback::dial_with_fallback;
pub use proxy::ProxyDialer;
pub use resolver::ProxyResolver;

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::{debug, instrument};

use crate::error::{Result, TetherError};

/// Network families accepted for outbound dials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Either address family ("tcp")
    #[default]
    Tcp,
    /// IPv4 only ("tcp4")
    Tcp4,
    /// IPv6 only ("tcp6")
    Tcp6,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Tcp4 => "tcp4",
            Self::Tcp6 => "tcp6",
        }
    }

    /// Check whether a resolved address belongs to this family
    pub fn matches(&self, addr: &SocketAddr) -> bool {
        match self {
            Self::Tcp => true,
            Self::Tcp4 => addr.is_ipv4(),
            Self::Tcp6 => addr.is_ipv6(),
        }
    }
}

impl FromStr for Network {
    type Err = TetherError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Self::Tcp),
            "tcp4" => Ok(Self::Tcp4),
            "tcp6" => Ok(Self::Tcp6),
            other => Err(TetherError::UnsupportedNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dial capability
///
/// Attempts to establish a connection to `addr`, optionally bounded
/// by a deadline. Implementations enforce their own deadline; the
/// fallback layer hands both attempts the same per-attempt budget,
/// never a shared one.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(
        &self,
        network: Network,
        addr: &str,
        deadline: Option<Duration>,
    ) -> Result<TcpStream>;
}

/// Dial a peer, routing through the configured proxy when one is
/// active and falling back to a direct connection if the proxy path
/// fails.
#[instrument(skip(resolver), fields(network = %network))]
pub async fn dial(resolver: &ProxyResolver, network: Network, addr: &str) -> Result<TcpStream> {
    dial_inner(resolver, network, addr, None).await
}

/// Dial a peer with a deadline applied to each attempt.
///
/// The proxy attempt and the direct fallback each get the full
/// `timeout` budget, so the worst-case wall-clock time is twice the
/// requested timeout.
#[instrument(skip(resolver), fields(network = %network))]
pub async fn dial_timeout(
    resolver: &ProxyResolver,
    network: Network,
    addr: &str,
    timeout: Duration,
) -> Result<TcpStream> {
    dial_inner(resolver, network, addr, Some(timeout)).await
}

async fn dial_inner(
    resolver: &ProxyResolver,
    network: Network,
    addr: &str,
    deadline: Option<Duration>,
) -> Result<TcpStream> {
    // The effective proxy is re-resolved on every call so that
    // configuration swaps between calls are picked up here.
    match resolver.resolve() {
        Some(proxy) => {
            debug!("Dialing {} via proxy with direct fallback", addr);
            dial_with_fallback(proxy.as_ref(), &DirectDialer, network, addr, deadline).await
        }
        None => DirectDialer.dial(network, addr, deadline).await,
    }
}
