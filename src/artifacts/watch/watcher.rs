//! Debounced auto-snapshot watcher
//!
//! Filesystem events for the tracked root (store events excluded) feed a
//! bounded channel; a background task runs the [`Debounce`] policy over
//! them and takes an auto snapshot once the tree has been quiet for the
//! configured period. Snapshot failures are logged and never stop the
//! watcher; an unchanged tree is simply a no-op.

use crate::areas::repository::{Repository, STORE_DIR};
use crate::artifacts::snapshot::{AUTO_SNAPSHOT_MESSAGE, SnapshotOutcome};
use crate::artifacts::watch::Debounce;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Quiet period applied when neither the CLI nor the config names one
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(2);

/// Events only wake the debounce task, so a small buffer suffices
const EVENT_CHANNEL_CAPACITY: usize = 128;

pub struct ChangeWatcher {
    // kept alive for the lifetime of the watch; dropping it unsubscribes
    _watcher: RecommendedWatcher,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ChangeWatcher {
    /// Start watching `root`, auto-snapshotting after each quiet period
    pub fn spawn(root: &Path, quiet_period: Duration) -> anyhow::Result<Self> {
        let root = root.to_path_buf();
        let store_path = root.join(STORE_DIR);

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                match result {
                    Ok(event) => {
                        // the store's own writes must never retrigger a snapshot
                        if event.paths.iter().any(|path| !path.starts_with(&store_path)) {
                            // a full channel already holds a wakeup, dropping is fine
                            let _ = event_tx.try_send(());
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "filesystem watch error"),
                }
            })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        let task = tokio::spawn(debounce_loop(root, quiet_period, event_rx, shutdown_rx));

        Ok(Self {
            _watcher: watcher,
            shutdown: Some(shutdown_tx),
            task,
        })
    }

    /// Stop watching, cancelling any pending trigger
    ///
    /// An auto snapshot already in flight runs to completion first.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = self.task.await;
    }
}

pub(crate) async fn debounce_loop(
    root: PathBuf,
    quiet_period: Duration,
    mut events: mpsc::Receiver<()>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut debounce = Debounce::new(quiet_period);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debounce.clear();
                break;
            }
            event = events.recv() => {
                match event {
                    Some(()) => debounce.record_event(Instant::now()),
                    None => break,
                }
            }
            _ = sleep_until_deadline(debounce.deadline()), if debounce.is_pending() => {
                if debounce.fire_if_elapsed(Instant::now()) {
                    // scanning and flocking block, keep them off the runtime thread
                    let root = root.clone();
                    if let Err(err) =
                        tokio::task::spawn_blocking(move || take_auto_snapshot(&root)).await
                    {
                        tracing::warn!(error = %err, "auto snapshot task failed");
                    }
                }
            }
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn take_auto_snapshot(root: &Path) {
    let result = match Repository::new(root, Box::new(std::io::sink())) {
        Ok(repository) => repository.take_snapshot(Some(AUTO_SNAPSHOT_MESSAGE)),
        Err(err) => Err(err),
    };

    match result {
        Ok(SnapshotOutcome::Created(snapshot)) => {
            tracing::info!(id = %snapshot.id(), "auto snapshot taken");
        }
        Ok(SnapshotOutcome::Unchanged { .. }) => {
            tracing::debug!("tree unchanged, no auto snapshot");
        }
        Err(err) => tracing::warn!(error = %err, "auto snapshot failed"),
    }
}
