//! Stats polling scheduler.
//!
//! A single background task ticks at a fixed period while the controller
//! is mounted. Each tick spawns a refresh without waiting for it, so a slow
//! stats source can produce overlapping refreshes; the last one to finish
//! wins. The task ends by itself on the first tick after unmount, and the
//! owning [`Poller`] aborts it on disarm or drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

use super::{lock, State};
use crate::core::domain::Stats;
use crate::core::items::StatsSource;

/// Owner of the polling task handle.
#[derive(Default)]
pub(crate) struct Poller {
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling, replacing any running task. The first tick fires one
    /// `period` from now.
    pub fn arm(
        &mut self,
        period: Duration,
        source: Arc<dyn StatsSource>,
        state: Arc<Mutex<State>>,
        live: Arc<AtomicBool>,
    ) {
        self.disarm();

        debug!(period_ms = period.as_millis() as u64, "stats poller armed");
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);

            loop {
                interval.tick().await;

                if !live.load(Ordering::SeqCst) {
                    debug!("controller unmounted, stats poller stopping");
                    break;
                }

                trace!("stats tick");
                tokio::spawn(refresh_if_live(
                    source.clone(),
                    state.clone(),
                    live.clone(),
                ));
            }
        }));
    }

    /// Stop polling. Safe to call when not armed.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("stats poller disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Fetch stats, logging and swallowing failures.
pub(crate) async fn fetch(source: &dyn StatsSource) -> Option<Stats> {
    match source.encrypted_items_stats().await {
        Ok(stats) => Some(stats.into()),
        Err(e) => {
            warn!(error = %e, "stats refresh failed");
            None
        }
    }
}

/// Scheduled refresh: the result is dropped if the controller was
/// unmounted while the fetch was in flight.
async fn refresh_if_live(
    source: Arc<dyn StatsSource>,
    state: Arc<Mutex<State>>,
    live: Arc<AtomicBool>,
) {
    let Some(stats) = fetch(source.as_ref()).await else {
        return;
    };
    if !live.load(Ordering::SeqCst) {
        trace!("discarding stats fetched after unmount");
        return;
    }
    lock(&state).stats = stats;
}
