//! Long-running mode: probe connectivity, sync on the timer and on reconnect.

use crate::cli::commands::{build_engine, open_store, print_cycle_result, runtime};
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::connectivity::{ConnectivityMonitor, ManualConnectivity, ProbeConnectivity};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How often the health URL is probed while watching.
const PROBE_PERIOD: Duration = Duration::from_secs(10);

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    runtime()?.block_on(async {
        let mut poller = None;
        let connectivity: Arc<dyn ConnectivityMonitor> = if cli.offline {
            Arc::new(ManualConnectivity::new(false))
        } else {
            let probe = Arc::new(
                ProbeConnectivity::new(&cfg.health_url(), cfg.request_timeout())
                    .map_err(|e| AppError::TransientNetworkError(e.to_string()))?,
            );
            poller = Some(probe.spawn_polling(PROBE_PERIOD));
            probe
        };

        let engine = build_engine(cfg, store, connectivity)?;

        if !engine.is_auto_sync_enabled()? {
            warning(
                "Auto-sync is disabled: watching, but no cycle will run \
                 until `skatesync auto-sync on`.",
            );
        }

        info(format!(
            "Watching (sync every {}s, debounce {}ms). Press Ctrl+C to stop.",
            engine.settings().sync_interval.as_secs(),
            engine.settings().reconnect_debounce.as_millis()
        ));

        // Catch up once at startup when online.
        if engine.is_auto_sync_enabled()?
            && engine.connectivity.current_state().await.is_online
        {
            print_cycle_result(&engine.force_full_sync().await);
        }

        let handle = engine.start_auto_sync();

        if let Err(e) = tokio::signal::ctrl_c().await {
            warning(format!("Cannot listen for Ctrl+C: {}", e));
        }

        debug!("stopping auto-sync");
        if let Some(p) = poller {
            p.abort();
        }
        handle.stop().await;

        info("Stopped.");
        Ok::<(), AppError>(())
    })
}
