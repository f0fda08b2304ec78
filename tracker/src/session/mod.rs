use crate::{
    api::{
        RecordApi,
        RecordId,
    },
    transport::TransportError,
};
use std::{
    fmt,
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
    },
};
use tokio::sync::mpsc::{
    channel,
    Receiver,
};
use tokio_util::sync::{
    CancellationToken,
    DropGuard,
};

mod heartbeat;

pub use heartbeat::REFRESH_INTERVAL;

/// Refresh failures kept for [`Session::next_failure`]. Further failures are only logged and counted.
pub const FAILURE_BACKLOG: usize = 16;

type Callback = Arc<dyn Fn(&RecordId) + Send + Sync>;

/// Hooks invoked over the lifetime of a session. Unset hooks do nothing.
#[derive(Clone, Default)]
pub struct Callbacks {
    on_created: Option<Callback>,
    on_refreshed: Option<Callback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_created", &self.on_created.is_some())
            .field("on_refreshed", &self.on_refreshed.is_some())
            .finish()
    }
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once, after the record has been created.
    pub fn on_created(mut self, f: impl Fn(&RecordId) + Send + Sync + 'static) -> Self {
        self.on_created = Some(Arc::new(f));
        self
    }

    /// Called after every successful refresh.
    pub fn on_refreshed(mut self, f: impl Fn(&RecordId) + Send + Sync + 'static) -> Self {
        self.on_refreshed = Some(Arc::new(f));
        self
    }

    pub(crate) fn created(&self, id: &RecordId) {
        if let Some(f) = &self.on_created {
            f(id);
        }
    }

    pub(crate) fn refreshed(&self, id: &RecordId) {
        if let Some(f) = &self.on_refreshed {
            f(id);
        }
    }
}

/// Handle to one tracked visit.
///
/// An active session owns the heartbeat of its record. Stopping the session, or dropping it, ends the heartbeat.
/// Sessions for visits that were not tracked are inert: they have no record and stopping them does nothing.
pub struct Session {
    record_id: Option<RecordId>,
    cancel: CancellationToken,
    _heartbeat_guard: Option<DropGuard>,
    failures: Option<Receiver<TransportError>>,
    dropped_failures: Arc<AtomicUsize>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("record_id", &self.record_id)
            .field("active", &self.is_active())
            .field("dropped_failures", &self.dropped_failures())
            .finish()
    }
}

impl Session {
    pub(crate) fn inert() -> Self {
        Self {
            record_id: None,
            cancel: CancellationToken::new(),
            _heartbeat_guard: None,
            failures: None,
            dropped_failures: Default::default(),
        }
    }

    /// Start the heartbeat for `id`. Must be called from within a tokio runtime.
    pub(crate) fn spawn(api: RecordApi, id: RecordId, callbacks: Callbacks) -> Self {
        let cancel = CancellationToken::new();
        let (failure_sender, failure_receiver) = channel(FAILURE_BACKLOG);
        let dropped_failures = Arc::new(AtomicUsize::new(0));

        tokio::spawn(heartbeat::run(
            api,
            id.clone(),
            callbacks,
            cancel.clone(),
            heartbeat::Failures::new(failure_sender, dropped_failures.clone()),
        ));

        Self {
            record_id: Some(id),
            _heartbeat_guard: Some(cancel.clone().drop_guard()),
            cancel,
            failures: Some(failure_receiver),
            dropped_failures,
        }
    }

    pub fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    /// Whether a heartbeat is running for this session.
    pub fn is_active(&self) -> bool {
        self.record_id.is_some() && !self.cancel.is_cancelled()
    }

    /// Stop refreshing the record. Safe to call any number of times, and on inert sessions.
    pub fn stop(&self) {
        if self.is_active() {
            debug!(record_id = ?self.record_id, "stopping session");
        }
        self.cancel.cancel();
    }

    /// Wait for the next failed refresh.
    ///
    /// At most [`FAILURE_BACKLOG`] failures are kept while nobody waits here, see [`Session::dropped_failures`].
    /// Returns `None` for inert sessions, and once the heartbeat has stopped and every refresh it sent has
    /// finished.
    pub async fn next_failure(&mut self) -> Option<TransportError> {
        match &mut self.failures {
            Some(failures) => failures.recv().await,
            None => None,
        }
    }

    /// Number of refresh failures discarded because the backlog was full.
    pub fn dropped_failures(&self) -> usize {
        self.dropped_failures.load(Ordering::Relaxed)
    }
}
