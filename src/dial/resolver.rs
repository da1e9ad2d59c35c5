//! Proxy resolution against the current configuration snapshot

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::ProxyEndpoint;
use crate::dial::{Dialer, ProxyDialer};
use crate::error::Result;

/// Decides, per dial, whether a proxy capability should be used.
///
/// The proxy endpoint is held as an immutable snapshot and swapped
/// atomically on change, so concurrent dials read it without locking.
/// [`resolve`](Self::resolve) consults the snapshot on every call and
/// never hands out a capability cached from a previous call, so a
/// swap between two dials is observed by the second one.
pub struct ProxyResolver {
    endpoint: ArcSwap<Option<ProxyEndpoint>>,
}

impl ProxyResolver {
    /// Resolver with the given endpoint (`None` = direct dialing only)
    pub fn new(endpoint: Option<ProxyEndpoint>) -> Self {
        Self {
            endpoint: ArcSwap::from_pointee(endpoint),
        }
    }

    /// Resolver with no proxy configured
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Build a resolver from the `TETHER_PROXY` environment variable.
    ///
    /// An unset or blank variable yields an unconfigured resolver; a
    /// malformed value is an error rather than a silent fallback to
    /// direct dialing.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ProxyEndpoint::from_env()?))
    }

    /// Replace the proxy endpoint used by subsequent dials
    pub fn set_endpoint(&self, endpoint: Option<ProxyEndpoint>) {
        self.endpoint.store(Arc::new(endpoint));
    }

    /// Check whether a proxy endpoint is currently configured
    pub fn is_configured(&self) -> bool {
        self.endpoint.load().is_some()
    }

    /// The currently configured endpoint, if any
    pub fn endpoint(&self) -> Option<ProxyEndpoint> {
        (**self.endpoint.load()).clone()
    }

    /// The dial capability to use for this call, if a proxy is active.
    ///
    /// Returns a freshly constructed capability each time; `None`
    /// means the caller should dial directly with no fallback.
    pub fn resolve(&self) -> Option<Box<dyn Dialer>> {
        let snapshot = self.endpoint.load();
        (**snapshot)
            .as_ref()
            .map(|endpoint| Box::new(ProxyDialer::new(endpoint.clone())) as Box<dyn Dialer>)
    }
}

impl fmt::Debug for ProxyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyResolver")
            .field("endpoint", &self.endpoint())
            .finish()
    }
}
