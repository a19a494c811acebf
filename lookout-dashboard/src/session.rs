use std::{sync::Arc, time::Duration};

use tokio::{
    task::{JoinHandle, JoinSet},
    time::MissedTickBehavior,
};
use tracing::{debug, error, info, warn};

use crate::{
    args::DashboardOptions,
    errors::{FetchError, Result},
    fetcher::{FetcherRef, HttpFetcher, SnapshotFetcher},
    render::render_rows,
    table::{DashboardTable, TableRef},
};

struct PollLoop {
    shutdown: async_broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

/// One dashboard instance: a fetcher, the table it feeds and at most one poll
/// loop.
pub struct DashboardSession {
    fetcher: FetcherRef,
    table: TableRef,
    interval: Duration,
    running: Option<PollLoop>,
}

impl DashboardSession {
    pub fn new(fetcher: FetcherRef, options: &DashboardOptions) -> Self {
        Self {
            fetcher,
            table: Arc::new(DashboardTable::new(options.stale_after)),
            interval: options.interval(),
            running: None,
        }
    }

    pub fn connect(options: &DashboardOptions) -> Result<Self> {
        let fetcher = HttpFetcher::new(&options.addr)?;
        Ok(Self::new(Arc::new(fetcher), options))
    }

    pub fn table(&self) -> TableRef {
        self.table.clone()
    }

    pub fn fetcher(&self) -> FetcherRef {
        self.fetcher.clone()
    }

    pub fn endpoint(&self) -> String {
        self.fetcher.endpoint()
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Spawns the poll loop. Calling it on a running session does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let (shutdown, shutdown_rx) = async_broadcast::broadcast(16);
        let handle = tokio::spawn(poll_loop(
            self.fetcher.clone(),
            self.table.clone(),
            self.interval,
            shutdown_rx,
        ));
        self.running = Some(PollLoop { shutdown, handle });
    }

    /// Stops the poll loop and drops any fetch still in flight.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(running) = self.running.take() {
            // a closed channel means the loop is already on its way out
            if let Err(err) = running.shutdown.broadcast(()).await {
                debug!("poll loop already stopped, {err}");
            }
            running.handle.await?;
        }
        Ok(())
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.handle.abort();
        }
    }
}

/// Runs one fetch-then-render cycle against `table`.
///
/// A failed cycle leaves the rows alone and only bumps the failure count.
pub async fn refresh(
    fetcher: &dyn SnapshotFetcher,
    table: &DashboardTable,
) -> core::result::Result<usize, FetchError> {
    match fetcher.fetch().await {
        Ok(snapshot) => {
            let rows = render_rows(&snapshot);
            let count = rows.len();
            table.replace_rows(rows);
            debug!("rendered {count} rows from {}", fetcher.endpoint());
            Ok(count)
        }
        Err(err) => {
            let failures = table.record_failure();
            if failures == table.stale_after() {
                warn!("{failures} polls failed in a row, showing stale data: {err}");
            } else {
                warn!("poll failed, {failures} in a row: {err}");
            }
            Err(err)
        }
    }
}

async fn poll_loop(
    fetcher: FetcherRef,
    table: TableRef,
    interval: Duration,
    mut shutdown: async_broadcast::Receiver<()>,
) {
    info!(
        "dashboard poll loop starting, polling {} every {interval:?}",
        fetcher.endpoint()
    );
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ticks never wait on earlier requests, so responses land in completion order
    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fetcher = fetcher.clone();
                let table = table.clone();
                in_flight.spawn(async move {
                    let _ = refresh(fetcher.as_ref(), &table).await;
                });
            }
            Some(ret) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = ret {
                    error!("refresh task failed, {err}");
                }
            }
            _ = shutdown.recv() => {
                break;
            }
        }
    }
    in_flight.abort_all();
    info!("dashboard poll loop stopped");
}
