use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{ApiError, Endpoint, Transport};

/// In-memory transport that records sent bodies and replays queued replies.
#[derive(Default)]
pub struct MemoryTransport {
    queued: Mutex<HashMap<Endpoint, VecDeque<Result<Value, String>>>>,
    sent: Mutex<Vec<(Endpoint, Value)>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for the next request to `endpoint`.
    pub async fn queue_response(&self, endpoint: Endpoint, response: Value) {
        self.queued
            .lock()
            .await
            .entry(endpoint)
            .or_default()
            .push_back(Ok(response));
    }

    /// Queue a transport failure for the next request to `endpoint`.
    pub async fn queue_failure(&self, endpoint: Endpoint, message: &str) {
        self.queued
            .lock()
            .await
            .entry(endpoint)
            .or_default()
            .push_back(Err(message.to_string()));
    }

    /// Every request seen so far, oldest first.
    pub async fn sent(&self) -> Vec<(Endpoint, Value)> {
        self.sent.lock().await.clone()
    }

    pub async fn last_sent(&self) -> Option<(Endpoint, Value)> {
        self.sent.lock().await.last().cloned()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn post_json(&self, endpoint: Endpoint, body: &Value) -> Result<Value, ApiError> {
        self.sent.lock().await.push((endpoint, body.clone()));

        let reply = self
            .queued
            .lock()
            .await
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(ApiError::Unavailable(message)),
            None => Err(ApiError::Unavailable(format!(
                "memory transport has no queued reply for {}",
                endpoint
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_sent_bodies() {
        let transport = MemoryTransport::new();
        let _ = transport
            .post_json(Endpoint::FetchProfile, &json!({"cellphone": "1"}))
            .await;
        let (endpoint, body) = transport.last_sent().await.expect("last request");
        assert_eq!(endpoint, Endpoint::FetchProfile);
        assert_eq!(body["cellphone"], "1");
    }

    #[tokio::test]
    async fn replays_replies_per_endpoint_in_order() {
        let transport = MemoryTransport::new();
        transport
            .queue_response(Endpoint::InsertUser, json!([{"bool": true}]))
            .await;
        transport
            .queue_failure(Endpoint::InsertUser, "connection refused")
            .await;

        let first = transport.post_json(Endpoint::InsertUser, &json!({})).await;
        assert_eq!(first.unwrap(), json!([{"bool": true}]));

        let second = transport.post_json(Endpoint::InsertUser, &json!({})).await;
        assert!(matches!(second, Err(ApiError::Unavailable(_))));

        let other = transport.post_json(Endpoint::ListTrips, &json!({})).await;
        assert!(other.is_err());
    }
}
