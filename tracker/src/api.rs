use crate::{
    attributes::{
        ActionAttributes,
        Attributes,
    },
    transport::{
        GraphQlRequest,
        Transport,
        TransportError,
        TransportResult,
    },
};
use derive_more::{
    Deref,
    Display,
};
use serde_json::{
    json,
    Value,
};
use std::sync::Arc;
use url::Url;

const CREATE_RECORD: &str = "
mutation createRecord($domainId: ID!, $input: CreateRecordInput!) {
    createRecord(domainId: $domainId, input: $input) {
        payload {
            id
        }
    }
}";

const UPDATE_RECORD: &str = "
mutation updateRecord($recordId: ID!) {
    updateRecord(id: $recordId) {
        success
    }
}";

const CREATE_ACTION: &str = "
mutation createAction($eventId: ID!, $input: CreateActionInput!) {
    createAction(eventId: $eventId, input: $input) {
        payload {
            id
        }
    }
}";

const UPDATE_ACTION: &str = "
mutation updateAction($actionId: ID!, $input: UpdateActionInput!) {
    updateAction(id: $actionId, input: $input) {
        success
    }
}";

/// Identifier of a record on the collector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display)]
pub struct RecordId(String);

/// Identifier of an event action on the collector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display)]
pub struct ActionId(String);

macro_rules! impl_id_from {
    ($id:ident) => {
        impl From<String> for $id {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $id {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

impl_id_from!(RecordId);
impl_id_from!(ActionId);

/// The collector operations, bound to a transport and an API endpoint.
#[derive(Clone)]
pub struct RecordApi {
    transport: Arc<dyn Transport>,
    endpoint: Url,
}

impl std::fmt::Debug for RecordApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordApi").field("endpoint", &self.endpoint.as_str()).finish()
    }
}

impl RecordApi {
    pub fn new(transport: Arc<dyn Transport>, endpoint: Url) -> Self {
        Self { transport, endpoint }
    }

    pub async fn create_record(&self, domain_id: &str, attributes: &Attributes) -> TransportResult<RecordId> {
        let request = GraphQlRequest::new(CREATE_RECORD, json!({ "domainId": domain_id, "input": attributes }));
        let data = self.transport.send(&self.endpoint, &request).await?;
        created_id(&data, "createRecord").map(RecordId)
    }

    pub async fn update_record(&self, id: &RecordId) -> TransportResult<bool> {
        let request = GraphQlRequest::new(UPDATE_RECORD, json!({ "recordId": id.as_str() }));
        let data = self.transport.send(&self.endpoint, &request).await?;
        success_flag(&data, "updateRecord")
    }

    pub async fn create_action(&self, event_id: &str, input: &ActionAttributes) -> TransportResult<ActionId> {
        let request = GraphQlRequest::new(CREATE_ACTION, json!({ "eventId": event_id, "input": input }));
        let data = self.transport.send(&self.endpoint, &request).await?;
        created_id(&data, "createAction").map(ActionId)
    }

    pub async fn update_action(&self, id: &ActionId, input: &ActionAttributes) -> TransportResult<bool> {
        let request = GraphQlRequest::new(UPDATE_ACTION, json!({ "actionId": id.as_str(), "input": input }));
        let data = self.transport.send(&self.endpoint, &request).await?;
        success_flag(&data, "updateAction")
    }
}

fn created_id(data: &Value, operation: &str) -> TransportResult<String> {
    data.pointer(&format!("/{operation}/payload/id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TransportError::MalformedBody(format!("{operation} response carries no id")))
}

fn success_flag(data: &Value, operation: &str) -> TransportResult<bool> {
    data.pointer(&format!("/{operation}/success"))
        .and_then(Value::as_bool)
        .ok_or_else(|| TransportError::MalformedBody(format!("{operation} response carries no success flag")))
}
