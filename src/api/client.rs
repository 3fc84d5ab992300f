//! Typed calls to the ride-hailing backend
//!
//! Every endpoint answers with a JSON array whose first element carries the
//! payload; this client unwraps that envelope.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::{IdentityQuery, TripsEnvelope, WriteAck, WriteKind, WriteOutcome};
use super::{ApiError, Endpoint, HttpTransport, Transport};
use crate::config::Config;
use crate::models::{Identity, Trip};

#[derive(Clone)]
pub struct RideClient {
    transport: Arc<dyn Transport>,
}

impl RideClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client talking HTTP to the configured backend
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// `/consultarViajes`: trips of the given caller, in response order
    pub async fn list_trips(&self, identity: &Identity) -> Result<Vec<Trip>, ApiError> {
        let body = identity_body(identity)?;
        let envelope: TripsEnvelope = self.call(Endpoint::ListTrips, &body).await?;
        info!(
            "Fetched {} trips for {} {}",
            envelope.viajes.len(),
            identity.role,
            identity.phone_number
        );
        Ok(envelope.viajes)
    }

    /// `/getDatos`: the stored field set of the given caller
    pub async fn fetch_profile(&self, identity: &Identity) -> Result<Map<String, Value>, ApiError> {
        let body = identity_body(identity)?;
        self.call(Endpoint::FetchProfile, &body).await
    }

    /// `/insertarUser` or `/actualizarDatos` with the full field set.
    ///
    /// Never fails: the outcome is logged and handed back for display only.
    pub async fn write_profile(&self, kind: WriteKind, body: &Value) -> WriteOutcome {
        let outcome = match self.call::<WriteAck>(kind.endpoint(), body).await {
            Ok(ack) if ack.accepted => WriteOutcome::Accepted,
            Ok(_) => WriteOutcome::Rejected,
            Err(e) => WriteOutcome::Failed(e),
        };

        match &outcome {
            WriteOutcome::Accepted => info!("{} actualizados exitosamente", kind.subject()),
            WriteOutcome::Rejected => warn!("{} sin actualizar", kind.subject()),
            WriteOutcome::Failed(e) => warn!("{} sin actualizar: {}", kind.subject(), e),
        }
        outcome
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint, body: &Value) -> Result<T, ApiError> {
        debug!("Calling {}", endpoint);
        let response = self.transport.post_json(endpoint, body).await?;
        first_element(endpoint, response)
    }
}

fn identity_body(identity: &Identity) -> Result<Value, ApiError> {
    serde_json::to_value(IdentityQuery::from(identity)).map_err(ApiError::Encode)
}

/// Decode `[0]` of an array response
fn first_element<T: DeserializeOwned>(endpoint: Endpoint, response: Value) -> Result<T, ApiError> {
    let first = match response {
        Value::Array(items) => items.into_iter().next(),
        _ => None,
    }
    .ok_or(ApiError::EmptyResponse { endpoint })?;

    serde_json::from_value(first).map_err(|e| ApiError::decode(endpoint, e))
}
