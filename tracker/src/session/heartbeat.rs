use super::Callbacks;
use crate::{
    api::{
        RecordApi,
        RecordId,
    },
    transport::TransportError,
};
use std::{
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
    },
    time::Duration,
};
use tokio::{
    sync::mpsc::{
        error::TrySendError,
        Sender,
    },
    time::{
        interval_at,
        Instant,
        MissedTickBehavior,
    },
};
use tokio_util::sync::CancellationToken;

/// Time between two refreshes of a record.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// Where failed refreshes go once they have been logged. Full backlogs drop the failure and count it.
#[derive(Clone)]
pub(super) struct Failures {
    sender: Sender<TransportError>,
    dropped: Arc<AtomicUsize>,
}

impl Failures {
    pub(super) fn new(sender: Sender<TransportError>, dropped: Arc<AtomicUsize>) -> Self {
        Self { sender, dropped }
    }

    fn report(&self, id: &RecordId, err: TransportError) {
        match self.sender.try_send(err) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(%id, dropped, "failure backlog full, discarding refresh failure");
            }
            // Nobody listening is fine, the error has been logged.
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

/// Refresh `id` every [`REFRESH_INTERVAL`] until `cancel` fires.
///
/// Each refresh runs as its own task so a request that never completes does not hold back later ticks. Stopping
/// does not abort refreshes already sent, but their completion is no longer reported.
pub(super) async fn run(
    api: RecordApi,
    id: RecordId,
    callbacks: Callbacks,
    cancel: CancellationToken,
    failures: Failures,
) {
    let mut ticks = interval_at(Instant::now() + REFRESH_INTERVAL, REFRESH_INTERVAL);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => {}
        }

        if cancel.is_cancelled() {
            break;
        }

        trace!(%id, "refreshing record");
        tokio::spawn(refresh(
            api.clone(),
            id.clone(),
            callbacks.clone(),
            cancel.clone(),
            failures.clone(),
        ));
    }

    debug!(%id, "heartbeat stopped");
}

async fn refresh(
    api: RecordApi,
    id: RecordId,
    callbacks: Callbacks,
    cancel: CancellationToken,
    failures: Failures,
) {
    match api.update_record(&id).await {
        Ok(_) if cancel.is_cancelled() => {
            debug!(%id, "refresh completed after the session was stopped");
        }
        Ok(acknowledged) => {
            if !acknowledged {
                debug!(%id, "collector did not acknowledge the refresh");
            }
            callbacks.refreshed(&id);
        }
        Err(err) => {
            error!(%id, "Failed to refresh record: {err}");
            failures.report(&id, err);
        }
    }
}
