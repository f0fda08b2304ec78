//! Start tracking from the declarative configuration on the marked element.

use crate::{
    environment::Environment,
    session::{
        Callbacks,
        Session,
    },
    tracker::Tracker,
    transport::Transport,
};
use eyre::{
    Context as _,
    Result,
};
use std::sync::Arc;
use visit_beacon_config::{
    element::{
        DOMAIN_ID_ATTRIBUTE,
        OPTIONS_ATTRIBUTE,
        SERVER_ATTRIBUTE,
    },
    ElementAttributes,
    TrackerOptions,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Bootstrap {
    pub server: String,
    pub domain_id: String,
    pub options: TrackerOptions,
}

impl Bootstrap {
    /// Read server, domain id and options from the element.
    ///
    /// No element, or one without server or domain id, means no tracking and is not an error. An options blob
    /// that is not valid JSON is.
    pub fn from_element(element: Option<&ElementAttributes>) -> Result<Option<Self>> {
        let Some(element) = element else {
            debug!("no beacon element, tracking disabled");
            return Ok(None);
        };

        let non_empty = |name: &str| element.get(name).map(|value| value.trim()).filter(|value| !value.is_empty());

        let (Some(server), Some(domain_id)) = (non_empty(SERVER_ATTRIBUTE), non_empty(DOMAIN_ID_ATTRIBUTE)) else {
            debug!("beacon element lacks {SERVER_ATTRIBUTE} or {DOMAIN_ID_ATTRIBUTE}, tracking disabled");
            return Ok(None);
        };

        let options = element
            .get(OPTIONS_ATTRIBUTE)
            .map(|json| TrackerOptions::from_json(json))
            .transpose()
            .wrap_err_with(|| format!("{OPTIONS_ATTRIBUTE} is not a valid options object"))?
            .unwrap_or_default();

        Ok(Some(Self {
            server: server.to_string(),
            domain_id: domain_id.to_string(),
            options,
        }))
    }

    pub fn tracker(&self, transport: Arc<dyn Transport>, environment: Arc<dyn Environment>) -> Result<Tracker> {
        Tracker::new(&self.server, &self.domain_id, self.options, transport, environment)
    }

    /// Create the tracker and start a session with the default attributes.
    pub async fn start(
        &self,
        transport: Arc<dyn Transport>,
        environment: Arc<dyn Environment>,
        callbacks: Callbacks,
    ) -> Result<Session> {
        let tracker = self.tracker(transport, environment)?;
        let session = tracker
            .start_session(None, callbacks)
            .await
            .context("failed to create record")?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeEnvironment,
        FakeTransport,
        Operation,
    };
    use pretty_assertions::assert_eq;

    fn element(pairs: &[(&str, &str)]) -> ElementAttributes {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn absent_element_is_silent() {
        assert_eq!(Bootstrap::from_element(None).unwrap(), None);
    }

    #[test]
    fn incomplete_element_is_silent() {
        let only_server = element(&[(SERVER_ATTRIBUTE, "https://t.example")]);
        assert_eq!(Bootstrap::from_element(Some(&only_server)).unwrap(), None);

        let blank_domain = element(&[(SERVER_ATTRIBUTE, "https://t.example"), (DOMAIN_ID_ATTRIBUTE, "  ")]);
        assert_eq!(Bootstrap::from_element(Some(&blank_domain)).unwrap(), None);
    }

    #[test]
    fn reads_server_domain_and_options() {
        let attributes = element(&[
            (SERVER_ATTRIBUTE, "https://t.example/"),
            (DOMAIN_ID_ATTRIBUTE, "domain-1"),
            (OPTIONS_ATTRIBUTE, r#"{ "detailed": true, "ignoreLocalhost": false }"#),
        ]);
        let bootstrap = Bootstrap::from_element(Some(&attributes)).unwrap().unwrap();
        assert_eq!(
            bootstrap,
            Bootstrap {
                server: "https://t.example/".to_string(),
                domain_id: "domain-1".to_string(),
                options: TrackerOptions {
                    detailed: true,
                    ignore_localhost: false,
                },
            }
        );
    }

    #[test]
    fn missing_options_use_defaults() {
        let attributes = element(&[(SERVER_ATTRIBUTE, "https://t.example"), (DOMAIN_ID_ATTRIBUTE, "domain-1")]);
        let bootstrap = Bootstrap::from_element(Some(&attributes)).unwrap().unwrap();
        assert_eq!(bootstrap.options, TrackerOptions::default());
    }

    #[test]
    fn malformed_options_are_an_error() {
        let attributes = element(&[
            (SERVER_ATTRIBUTE, "https://t.example"),
            (DOMAIN_ID_ATTRIBUTE, "domain-1"),
            (OPTIONS_ATTRIBUTE, "{ detailed"),
        ]);
        assert!(Bootstrap::from_element(Some(&attributes)).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn start_creates_a_record_with_default_attributes() {
        let attributes = element(&[
            (SERVER_ATTRIBUTE, "https://t.example"),
            (DOMAIN_ID_ATTRIBUTE, "domain-1"),
            (OPTIONS_ATTRIBUTE, r#"{ "detailed": true }"#),
        ]);
        let bootstrap = Bootstrap::from_element(Some(&attributes)).unwrap().unwrap();
        let transport = FakeTransport::new("abc123");

        let session = bootstrap
            .start(
                transport.clone(),
                Arc::new(FakeEnvironment::desktop("shop.example")),
                Callbacks::new(),
            )
            .await
            .unwrap();

        assert!(session.is_active());
        assert_eq!(transport.operations(), vec![Operation::CreateRecord]);
        let sent = transport.requests();
        assert_eq!(sent[0].endpoint, "https://t.example/api");
        assert_eq!(sent[0].request.variables["input"]["screenWidth"], 2560);
        session.stop();
    }
}
