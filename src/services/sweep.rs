use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::AppState;

/// Periodic maintenance: cancel whatever is still Pending, then drop the
/// Cancelled rows. Runs only when enabled in config; the same operations
/// are reachable on demand through the maintenance endpoints.
pub struct SweepService {
    state: Arc<AppState>,
    interval: Duration,
}

impl SweepService {
    pub fn new(state: Arc<AppState>) -> Self {
        let interval = Duration::from_secs(state.config.sweeper.interval_secs);
        Self { state, interval }
    }

    pub async fn run_once(&self) {
        match self.state.engine.release_stale_pending().await {
            Ok(released) if released > 0 => info!(released, "sweep released pending bookings"),
            Ok(_) => {}
            Err(e) => error!("sweep failed to release pending bookings: {e}"),
        }

        match self.state.engine.purge_cancelled().await {
            Ok(removed) if removed > 0 => info!(removed, "sweep purged cancelled bookings"),
            Ok(_) => {}
            Err(e) => error!("sweep failed to purge cancelled bookings: {e}"),
        }
    }

    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "sweeper started");
        loop {
            self.run_once().await;
            tokio::time::sleep(self.interval).await;
        }
    }
}
