/// Periodic stale-order sweeper
///
/// Ticks on a fixed interval, cancelling stale pending orders and purging
/// cancelled orders past retention. The handle owns a shutdown channel so
/// the server can stop the loop cleanly on exit.
use crate::services::OrderService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct OrderSweeper {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl OrderSweeper {
    /// Spawn the sweep loop.
    pub fn start(orders: Arc<OrderService>, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The immediate first tick reconciles anything left over from
            // a previous run
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = orders.reconcile_stale_orders().await {
                            tracing::error!("Stale order sweep failed: {}", e);
                        }
                        if let Err(e) = orders.purge_expired_cancelled().await {
                            tracing::error!("Cancelled order purge failed: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Order sweeper stopping");
                            break;
                        }
                    }
                }
            }
        });

        Self { shutdown_tx, task }
    }

    /// Stop the loop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}
