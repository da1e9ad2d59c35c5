//! Tether - Resilient outbound dialing for peer links
//!
//! Establishes outbound TCP connections for a peer-to-peer
//! application that may need to route traffic through a proxy.
//!
//! ## Features
//!
//! - Dialing through HTTP CONNECT and SOCKS5 proxies, with optional
//!   authentication
//! - Transparent fallback to a direct connection when the proxy path
//!   fails or no proxy is active
//! - Per-attempt dial deadlines
//! - Proxy configuration from the `TETHER_PROXY` environment
//!   variable, swappable at runtime without locking
//! - TCP option tuning (linger, Nagle, keep-alive) for long-lived
//!   peer connections

pub mod config;
pub mod dial;
pub mod error;
pub mod tcp;

pub use config::{ProxyEndpoint, ProxyProtocol};
pub use dial::{
    dial, dial_timeout, dial_with_fallback, Dialer, DirectDialer, Network, ProxyDialer,
    ProxyResolver,
};
pub use error::{Result, TetherError};
pub use tcp::set_tcp_options;
