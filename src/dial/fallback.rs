//! Transparent primary/secondary dial fallback

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

use crate::dial::{Dialer, Network};
use crate::error::Result;

/// Try `primary`, and on any failure retry once with `secondary`.
///
/// On primary success the secondary is never invoked. On primary
/// failure the secondary's outcome is returned verbatim; the
/// primary's error is only logged. Each capability enforces its own
/// deadline, so the two attempts may together take up to twice the
/// per-attempt budget.
pub async fn dial_with_fallback(
    primary: &dyn Dialer,
    secondary: &dyn Dialer,
    network: Network,
    addr: &str,
    deadline: Option<Duration>,
) -> Result<TcpStream> {
    match primary.dial(network, addr, deadline).await {
        Ok(stream) => Ok(stream),
        Err(primary_err) => {
            debug!("Primary dial to {} failed, falling back: {}", addr, primary_err);
            secondary.dial(network, addr, deadline).await
        }
    }
}
