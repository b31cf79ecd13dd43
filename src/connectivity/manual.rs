use crate::connectivity::{ConnectivityMonitor, NetworkState};
use async_trait::async_trait;
use tokio::sync::watch;

/// Connectivity set by hand. Backs the CLI `--offline` flag and the tests.
pub struct ManualConnectivity {
    tx: watch::Sender<bool>,
}

impl ManualConnectivity {
    pub fn new(is_online: bool) -> Self {
        let (tx, _rx) = watch::channel(is_online);
        Self { tx }
    }

    pub fn set_online(&self, is_online: bool) {
        // send_if_modified: subscribers only wake on real transitions
        self.tx.send_if_modified(|current| {
            if *current == is_online {
                false
            } else {
                *current = is_online;
                true
            }
        });
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }
}

#[async_trait]
impl ConnectivityMonitor for ManualConnectivity {
    async fn current_state(&self) -> NetworkState {
        NetworkState {
            is_online: self.is_online(),
        }
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
