//! In-memory stand-ins for the collector and the visited page.

use crate::{
    environment::{
        Environment,
        Platform,
        Screen,
        Viewport,
    },
    transport::{
        GraphQlRequest,
        Transport,
        TransportError,
        TransportFuture,
    },
};
use serde_json::json;
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        Mutex,
    },
    time::Duration,
};
use url::Url;

#[derive(Debug, Clone)]
pub(crate) struct FakeEnvironment {
    hostname: String,
    user_agent: String,
}

impl FakeEnvironment {
    /// A desktop Firefox visiting `https://{hostname}/products`.
    pub(crate) fn desktop(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string(),
        }
    }

    pub(crate) fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

impl Environment for FakeEnvironment {
    fn location(&self) -> String {
        format!("https://{}/products", self.hostname)
    }

    fn referrer(&self) -> Option<String> {
        Some("https://search.example/?q=shop".to_string())
    }

    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn language(&self) -> Option<String> {
        Some("de-DE".to_string())
    }

    fn screen(&self) -> Screen {
        Screen {
            width: Some(2560),
            height: Some(1440),
            color_depth: Some(24),
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: Some(1280),
            height: Some(720),
        }
    }

    fn platform(&self) -> Platform {
        Platform {
            os_name: Some("Linux".to_string()),
            browser_name: Some("Firefox".to_string()),
            browser_version: Some("128.0".to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    CreateRecord,
    UpdateRecord,
    CreateAction,
    UpdateAction,
}

impl Operation {
    fn of(request: &GraphQlRequest) -> Self {
        [
            ("createRecord", Self::CreateRecord),
            ("updateRecord", Self::UpdateRecord),
            ("createAction", Self::CreateAction),
            ("updateAction", Self::UpdateAction),
        ]
        .into_iter()
        .find_map(|(name, operation)| request.query.contains(name).then_some(operation))
        .unwrap_or_else(|| panic!("unknown query: {}", request.query))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SentRequest {
    pub(crate) endpoint: String,
    pub(crate) request: GraphQlRequest,
}

#[derive(Default)]
struct FakeState {
    requests: Vec<SentRequest>,
    failures: VecDeque<TransportError>,
    hang_next: bool,
    update_delay: Option<Duration>,
    reject_updates: bool,
    completed_updates: usize,
}

/// Answers every operation successfully, creating records with a fixed id, unless told otherwise.
pub(crate) struct FakeTransport {
    record_id: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub(crate) fn new(record_id: &str) -> Arc<Self> {
        Arc::new(Self {
            record_id: record_id.to_string(),
            state: Default::default(),
        })
    }

    /// The next request fails with `err`. Calls queue up.
    pub(crate) fn fail_next(&self, err: TransportError) {
        self.state.lock().unwrap().failures.push_back(err);
    }

    /// The next request never completes.
    pub(crate) fn hang_next(&self) {
        self.state.lock().unwrap().hang_next = true;
    }

    /// Every record refresh takes `delay` to complete.
    pub(crate) fn delay_updates(&self, delay: Duration) {
        self.state.lock().unwrap().update_delay = Some(delay);
    }

    /// Record refreshes answer `success: false`.
    pub(crate) fn reject_updates(&self) {
        self.state.lock().unwrap().reject_updates = true;
    }

    pub(crate) fn requests(&self) -> Vec<SentRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn operations(&self) -> Vec<Operation> {
        self.requests().iter().map(|sent| Operation::of(&sent.request)).collect()
    }

    pub(crate) fn completed_updates(&self) -> usize {
        self.state.lock().unwrap().completed_updates
    }
}

impl Transport for FakeTransport {
    fn send<'a>(&'a self, endpoint: &'a Url, request: &'a GraphQlRequest) -> TransportFuture<'a> {
        let operation = Operation::of(request);

        let (failure, hang, delay) = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(SentRequest {
                endpoint: endpoint.to_string(),
                request: request.clone(),
            });
            let delay = state.update_delay.filter(|_| operation == Operation::UpdateRecord);
            (state.failures.pop_front(), std::mem::take(&mut state.hang_next), delay)
        };

        let state = self.state.clone();
        let record_id = self.record_id.clone();

        Box::pin(async move {
            if hang {
                std::future::pending::<()>().await;
            }
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(err) = failure {
                return Err(err);
            }

            Ok(match operation {
                Operation::CreateRecord => json!({ "createRecord": { "payload": { "id": record_id } } }),
                Operation::UpdateRecord => {
                    let mut state = state.lock().unwrap();
                    state.completed_updates += 1;
                    json!({ "updateRecord": { "success": !state.reject_updates } })
                }
                Operation::CreateAction => json!({ "createAction": { "payload": { "id": "action-1" } } }),
                Operation::UpdateAction => json!({ "updateAction": { "success": true } }),
            })
        })
    }
}
