//! Online/offline reporting consumed by the sync engine.

pub mod manual;
pub mod probe;

use async_trait::async_trait;
use tokio::sync::watch;

pub use manual::ManualConnectivity;
pub use probe::ProbeConnectivity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkState {
    pub is_online: bool,
}

#[async_trait]
pub trait ConnectivityMonitor: Send + Sync {
    /// Current state; may do I/O (e.g. a health probe).
    async fn current_state(&self) -> NetworkState;

    /// Stream of `is_online` transitions. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> watch::Receiver<bool>;
}
