//! Trip history view controller

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{emit_to, MountId, ViewContext, ViewEvent};
use crate::api::ApiError;
use crate::models::{Identity, NavTarget, Role, Trip};

#[derive(Debug, Clone, PartialEq)]
pub enum TripListState {
    Loading,
    Loaded(Vec<Trip>),
    Failed(String),
}

/// Lists the trips of the mounted identity
pub struct TripList {
    identity: Identity,
    state: TripListState,
    mount: MountId,
    mounted: bool,
    ctx: ViewContext,
}

impl TripList {
    pub fn mount(identity: Identity, ctx: ViewContext) -> Self {
        let list = Self {
            identity,
            state: TripListState::Loading,
            mount: MountId::next(),
            mounted: true,
            ctx,
        };
        info!("Mounted trip list for {} ({})", list.identity.role, list.mount);
        list.request_trips();
        list
    }

    fn request_trips(&self) {
        let client = self.ctx.client.clone();
        let events = self.ctx.sender();
        let identity = self.identity.clone();
        let mount = self.mount;

        tokio::spawn(async move {
            let result = client.list_trips(&identity).await;
            emit_to(&events, ViewEvent::TripsLoaded { mount, result });
        });
    }

    /// Store a `/consultarViajes` result. Returns whether the state changed.
    pub fn on_trips_loaded(&mut self, mount: MountId, result: Result<Vec<Trip>, ApiError>) -> bool {
        if !self.mounted || mount != self.mount {
            debug!("Discarding trips for {} (current {})", mount, self.mount);
            return false;
        }

        self.state = match result {
            Ok(trips) => TripListState::Loaded(trips),
            Err(e) => {
                warn!("Could not load trips: {}", e);
                TripListState::Failed(e.to_string())
            }
        };
        true
    }

    /// Back to the menu of the caller's role
    pub fn back(&self) {
        self.ctx.navigate(NavTarget::menu_for(self.identity.role));
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn state(&self) -> &TripListState {
        &self.state
    }

    /// Loaded trips; empty while loading or after a failure
    pub fn trips(&self) -> &[Trip] {
        match &self.state {
            TripListState::Loaded(trips) => trips,
            _ => &[],
        }
    }

    /// One display unit per trip, in response order
    pub fn cards(&self) -> Vec<TripCard<'_>> {
        self.trips()
            .iter()
            .map(|trip| TripCard {
                key: trip.key(),
                role: self.identity.role,
                trip,
            })
            .collect()
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn mount_id(&self) -> MountId {
        self.mount
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

/// Display unit for one trip; the record is shown as received
#[derive(Debug, Clone, PartialEq)]
pub struct TripCard<'a> {
    pub key: String,
    pub role: Role,
    pub trip: &'a Trip,
}

impl TripCard<'_> {
    pub fn title(&self) -> String {
        match self.role {
            Role::Rider => format!("Viaje #{}", self.key),
            Role::Driver => format!("Servicio #{}", self.key),
        }
    }

    /// `key: value` lines for every field other than the id
    pub fn lines(&self) -> Vec<String> {
        self.trip
            .details
            .iter()
            .map(|(key, value)| format!("{}: {}", key, display_value(value)))
            .collect()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use crate::views::test_support::memory_context;
    use serde_json::json;

    async fn next_trips(
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<ViewEvent>,
    ) -> (MountId, Result<Vec<Trip>, ApiError>) {
        match rx.recv().await {
            Some(ViewEvent::TripsLoaded { mount, result }) => (mount, result),
            other => panic!("expected trips event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_two_trips_render_two_cards_in_order() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(
                Endpoint::ListTrips,
                json!([{"viajes": [
                    {"id": 1, "origen": "Centro", "destino": "Norte"},
                    {"id": 2, "origen": "Sur", "destino": "Centro"}
                ]}]),
            )
            .await;

        let mut list = TripList::mount(Identity::new("3001234567", Role::Rider), ctx);
        assert_eq!(list.state(), &TripListState::Loading);
        assert!(list.cards().is_empty());

        let (mount, result) = next_trips(&mut rx).await;
        assert!(list.on_trips_loaded(mount, result));

        let cards = list.cards();
        let keys: Vec<&str> = cards.iter().map(|card| card.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "2"]);
        assert!(cards.iter().all(|card| card.role == Role::Rider));
        assert_eq!(cards[0].trip.details["origen"], "Centro");
        assert_eq!(cards[0].title(), "Viaje #1");
        assert_eq!(cards[1].lines(), vec!["destino: Centro", "origen: Sur"]);

        let (endpoint, body) = transport.last_sent().await.unwrap();
        assert_eq!(endpoint, Endpoint::ListTrips);
        assert_eq!(body, json!({"cellphone": "3001234567", "user": "Usuario"}));
    }

    #[tokio::test]
    async fn test_empty_trip_list_is_not_an_error() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::ListTrips, json!([{"viajes": []}]))
            .await;

        let mut list = TripList::mount(Identity::new("1", Role::Driver), ctx);
        let (mount, result) = next_trips(&mut rx).await;
        list.on_trips_loaded(mount, result);

        assert_eq!(list.state(), &TripListState::Loaded(Vec::new()));
        assert!(list.cards().is_empty());
    }

    #[tokio::test]
    async fn test_null_trip_list_is_empty() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::ListTrips, json!([{"viajes": null}]))
            .await;

        let mut list = TripList::mount(Identity::new("1", Role::Rider), ctx);
        let (mount, result) = next_trips(&mut rx).await;
        list.on_trips_loaded(mount, result);

        assert_eq!(list.state(), &TripListState::Loaded(Vec::new()));
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_to_error_state() {
        let (ctx, transport, mut rx) = memory_context();
        transport.queue_failure(Endpoint::ListTrips, "timeout").await;

        let mut list = TripList::mount(Identity::new("1", Role::Driver), ctx);
        let (mount, result) = next_trips(&mut rx).await;
        list.on_trips_loaded(mount, result);

        assert!(matches!(list.state(), TripListState::Failed(_)));
        assert!(list.trips().is_empty());
    }

    #[tokio::test]
    async fn test_trips_after_unmount_are_discarded() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::ListTrips, json!([{"viajes": [{"id": 9}]}]))
            .await;

        let mut list = TripList::mount(Identity::new("1", Role::Rider), ctx);
        list.unmount();

        let (mount, result) = next_trips(&mut rx).await;
        assert!(!list.on_trips_loaded(mount, result));
        assert_eq!(list.state(), &TripListState::Loading);
    }

    #[tokio::test]
    async fn test_back_goes_to_role_menu() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::ListTrips, json!([{"viajes": []}]))
            .await;
        let list = TripList::mount(Identity::new("1", Role::Driver), ctx);
        list.back();

        let mut targets = Vec::new();
        while let Some(event) = rx.recv().await {
            if let ViewEvent::Navigate(target) = event {
                targets.push(target);
                break;
            }
        }
        assert_eq!(targets, vec![NavTarget::Menu(Role::Driver)]);
    }
}
