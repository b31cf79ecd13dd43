use crate::connectivity::{ConnectivityMonitor, NetworkState};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Treats the remote service as reachable when its health URL answers.
pub struct ProbeConnectivity {
    client: Client,
    health_url: String,
    tx: watch::Sender<bool>,
}

impl ProbeConnectivity {
    pub fn new(health_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let (tx, _rx) = watch::channel(false);
        Ok(Self {
            client,
            health_url: health_url.to_string(),
            tx,
        })
    }

    /// Any HTTP answer counts as online; only transport failures mean offline.
    pub async fn probe(&self) -> bool {
        match self.client.get(&self.health_url).send().await {
            Ok(resp) => {
                debug!(status = %resp.status(), "health probe answered");
                true
            }
            Err(e) => {
                debug!(error = %e, "health probe failed");
                false
            }
        }
    }

    fn publish(&self, is_online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == is_online {
                false
            } else {
                *current = is_online;
                true
            }
        });
        if changed {
            info!(is_online, "connectivity changed");
        }
    }

    /// Probe every `period` and publish transitions to subscribers.
    /// Abort the returned handle to stop polling.
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let online = this.probe().await;
                this.publish(online);
            }
        })
    }
}

#[async_trait]
impl ConnectivityMonitor for ProbeConnectivity {
    async fn current_state(&self) -> NetworkState {
        let is_online = self.probe().await;
        self.publish(is_online);
        NetworkState { is_online }
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
