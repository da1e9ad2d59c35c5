//! Direct TCP dialing

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{lookup_host, TcpStream};
use tokio::time;
use tracing::debug;

use crate::dial::{Dialer, Network};
use crate::error::{Result, TetherError};

/// Dials targets directly, without any proxy involvement.
///
/// Resolves the target and attempts each address matching the
/// requested network family in order, returning the first established
/// connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectDialer;

#[async_trait]
impl Dialer for DirectDialer {
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

impl DirectDialer {
    async fn connect(&self, network: Network, addr: &str) -> Result<TcpStream> {
        let candidates: Vec<SocketAddr> = lookup_host(addr)
            .await
            .map_err(|e| TetherError::InvalidAddress(format!("{}: {}", addr, e)))?
            .filter(|candidate| network.matches(candidate))
            .collect();

        let mut last_err: Option<io::Error> = None;
        for candidate in candidates {
            match TcpStream::connect(candidate).await {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!("Direct connect to {} failed: {}", candidate, e);
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(TetherError::Io(e)),
            None => Err(TetherError::InvalidAddress(format!(
                "{}: no {} addresses",
                addr, network
            ))),
        }
    }
}
