//! Standing-filter update monitor.
//!
//! Drives the change-polling protocol the way a reconciliation loop consumes
//! it: one blocking long poll at a time, the returned version token fed
//! verbatim into the next call, each delta forwarded over a channel. Timeout
//! and out-of-band cancellation are benign iterations, not errors; transport
//! failures end the loop and propagate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::client::InventoryClient;
use crate::error::Result;
use crate::types::{ManagedObjectRef, UpdateSet, WaitOptions};

/// Cooperative polling loop over one collector.
///
/// Owns the version token across calls. The first poll uses the empty
/// version and therefore receives the full baseline snapshot.
pub struct UpdateMonitor {
    client: InventoryClient,
    collector: ManagedObjectRef,
    options: WaitOptions,
    version: String,
    shutdown: Arc<AtomicBool>,
}

/// Out-of-band control for a running [`UpdateMonitor`].
#[derive(Clone)]
pub struct MonitorHandle {
    client: InventoryClient,
    collector: ManagedObjectRef,
    shutdown: Arc<AtomicBool>,
}

impl MonitorHandle {
    /// Ask the monitor to stop and unblock its pending wait.
    pub async fn stop(&self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        self.client.cancel_wait_on(&self.collector).await
    }
}

impl UpdateMonitor {
    /// Create a monitor polling `collector` with the client's wait options.
    pub fn new(client: InventoryClient, collector: ManagedObjectRef) -> Self {
        let options = client.settings().wait_options();
        Self::with_options(client, collector, options)
    }

    /// Create a monitor with explicit wait options.
    pub fn with_options(
        client: InventoryClient,
        collector: ManagedObjectRef,
        options: WaitOptions,
    ) -> Self {
        Self {
            client,
            collector,
            options,
            version: String::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Control handle for stopping the monitor from another task.
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle {
            client: self.client.clone(),
            collector: self.collector.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Run the poll loop, forwarding each update set to `tx`.
    ///
    /// Returns when stopped via the handle, when the receiver is dropped, or
    /// with the error when a poll fails.
    #[instrument(skip(self, tx), fields(collector = %self.collector))]
    pub async fn run(mut self, tx: mpsc::Sender<UpdateSet>) -> Result<()> {
        info!(
            wait_secs = self.options.max_wait_seconds,
            "Starting update monitor"
        );
        while !self.shutdown.load(Ordering::SeqCst) {
            let update = self
                .client
                .wait_for_updates_with(&self.collector, &self.version, self.options)
                .await?;
            match update {
                Some(set) => {
                    debug!(
                        version = %set.version,
                        updates = set.updates.len(),
                        "Received update set"
                    );
                    self.version = set.version.clone();
                    if tx.send(set).await.is_err() {
                        debug!("Update receiver dropped, stopping monitor");
                        break;
                    }
                }
                None => {
                    // Wait budget elapsed or the wait was canceled.
                    debug!("Wait returned without updates");
                    tokio::task::yield_now().await;
                }
            }
        }
        info!("Update monitor stopped");
        Ok(())
    }
}
