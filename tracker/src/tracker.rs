use crate::{
    api::{
        ActionId,
        RecordApi,
        RecordId,
    },
    attributes::{
        ActionAttributes,
        Attributes,
    },
    eligibility::{
        is_suppressed_identifier,
        Eligibility,
    },
    environment::Environment,
    session::{
        Callbacks,
        Session,
    },
    transport::{
        endpoint,
        Transport,
        TransportResult,
    },
};
use eyre::{
    Context as _,
    Result,
};
use std::sync::Arc;
use visit_beacon_config::TrackerOptions;

/// Creates records for visits on one domain and keeps them alive.
#[derive(Clone)]
pub struct Tracker {
    domain_id: String,
    options: TrackerOptions,
    api: RecordApi,
    environment: Arc<dyn Environment>,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("domain_id", &self.domain_id)
            .field("options", &self.options)
            .field("api", &self.api)
            .finish()
    }
}

impl Tracker {
    pub fn new(
        server: &str,
        domain_id: impl ToString,
        options: TrackerOptions,
        transport: Arc<dyn Transport>,
        environment: Arc<dyn Environment>,
    ) -> Result<Self> {
        let endpoint = endpoint(server).wrap_err_with(|| format!("invalid collector URL {server:?}"))?;
        Ok(Self {
            domain_id: domain_id.to_string(),
            options,
            api: RecordApi::new(transport, endpoint),
            environment,
        })
    }

    /// Attributes of the current visit at the configured detail tier.
    pub fn attributes(&self) -> Attributes {
        Attributes::collect(self.environment.as_ref(), self.options.detailed)
    }

    fn eligibility(&self) -> Eligibility {
        Eligibility::check(
            &self.options,
            &self.environment.hostname(),
            &self.environment.user_agent(),
        )
    }

    /// Register a new record for this visit and start refreshing it.
    ///
    /// Visits that are not eligible, or that the collector suppresses, yield an inert session without an error.
    /// A failing creation request is returned as is and no heartbeat is started.
    #[instrument(level = "debug", skip_all, fields(domain_id = %self.domain_id))]
    pub async fn start_session(&self, attributes: Option<Attributes>, callbacks: Callbacks) -> TransportResult<Session> {
        let eligibility = self.eligibility();
        if !eligibility.is_eligible() {
            warn!("Visit will not be tracked: {eligibility}");
            return Ok(Session::inert());
        }

        let attributes = attributes.unwrap_or_else(|| self.attributes());
        let id = self.api.create_record(&self.domain_id, &attributes).await?;

        if is_suppressed_identifier(&id) {
            warn!("Collector suppressed this visit, it will not be tracked");
            return Ok(Session::inert());
        }

        info!(%id, "record created");
        callbacks.created(&id);

        Ok(Session::spawn(self.api.clone(), id, callbacks))
    }

    /// Keep refreshing a record created earlier, without creating a new one.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(level = "debug", skip_all, fields(domain_id = %self.domain_id))]
    pub fn resume_session(&self, id: impl Into<RecordId>, callbacks: Callbacks) -> Session {
        let id = id.into();

        let eligibility = self.eligibility();
        if !eligibility.is_eligible() {
            warn!("Visit will not be tracked: {eligibility}");
            return Session::inert();
        }

        if is_suppressed_identifier(&id) {
            warn!("Record id is suppressed by the collector, it will not be refreshed");
            return Session::inert();
        }

        debug!("resuming record");
        Session::spawn(self.api.clone(), id, callbacks)
    }

    /// Record an event action. Returns `None` when the visit is not eligible for tracking.
    #[instrument(level = "debug", skip(self, attributes), fields(domain_id = %self.domain_id))]
    pub async fn action(&self, event_id: &str, attributes: &ActionAttributes) -> TransportResult<Option<ActionId>> {
        let eligibility = self.eligibility();
        if !eligibility.is_eligible() {
            warn!("Action will not be tracked: {eligibility}");
            return Ok(None);
        }

        let id = self.api.create_action(event_id, attributes).await?;
        debug!(%id, "action created");
        Ok(Some(id))
    }

    /// Update the value of an action created earlier. Does nothing when the visit is not eligible for tracking.
    #[instrument(level = "debug", skip(self, attributes), fields(domain_id = %self.domain_id))]
    pub async fn update_action(&self, id: &ActionId, attributes: &ActionAttributes) -> TransportResult<()> {
        let eligibility = self.eligibility();
        if !eligibility.is_eligible() {
            warn!("Action will not be tracked: {eligibility}");
            return Ok(());
        }

        self.api.update_action(id, attributes).await?;
        Ok(())
    }
}
