//! TCP option tuning for established peer links

use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;

use crate::error::Result;

/// Keep-alive probe period applied to peer connections
pub const KEEPALIVE_PERIOD: Duration = Duration::from_secs(60);

/// Apply the default TCP options for long-lived peer connections.
///
/// Options are applied in a fixed order with an early return on the
/// first failure; settings already applied stay in effect.
///
/// - linger 0: discard unsent data and reset on close instead of a
///   graceful flush
/// - Nagle left enabled: bulk sync traffic favors throughput over
///   small-write latency
/// - keep-alive probing every 60 seconds, enabled last
pub fn set_tcp_options(stream: &TcpStream) -> Result<()> {
    let sock = SockRef::from(stream);
    sock.set_linger(Some(Duration::ZERO))?;
    sock.set_nodelay(false)?;
    sock.set_tcp_keepalive(&TcpKeepalive::new().with_time(KEEPALIVE_PERIOD))?;
    sock.set_keepalive(true)?;
    Ok(())
}
