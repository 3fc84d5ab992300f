//! Headless view controllers
//!
//! A view owns its state exclusively, starts its own background requests
//! and reports results and navigation requests as [`ViewEvent`]s on the
//! channel in its [`ViewContext`]. The host routes load results back to the
//! view that asked for them; a view only accepts results stamped with its
//! own [`MountId`] while it is still mounted.

pub mod registration;
pub mod trip_list;

pub use registration::{ProfileLoad, RegistrationForm};
pub use trip_list::{TripCard, TripList, TripListState};

use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::{ApiError, RideClient, WriteKind, WriteOutcome};
use crate::models::{NavTarget, Trip};

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

/// Identifies one mount of one view; never reused within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl MountId {
    pub fn next() -> Self {
        MountId(NEXT_MOUNT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mount#{}", self.0)
    }
}

/// Messages views send to their host
#[derive(Debug)]
pub enum ViewEvent {
    /// Switch the mounted top-level view
    Navigate(NavTarget),
    /// `/getDatos` finished for the registration form mounted as `mount`
    ProfileLoaded {
        mount: MountId,
        result: Result<Map<String, Value>, ApiError>,
    },
    /// `/consultarViajes` finished for the trip list mounted as `mount`
    TripsLoaded {
        mount: MountId,
        result: Result<Vec<Trip>, ApiError>,
    },
    /// A profile write finished; informational only
    WriteFinished {
        kind: WriteKind,
        outcome: WriteOutcome,
    },
}

/// What a view needs from its host: the backend client and the event channel
#[derive(Clone)]
pub struct ViewContext {
    pub client: RideClient,
    events: UnboundedSender<ViewEvent>,
}

impl ViewContext {
    pub fn new(client: RideClient, events: UnboundedSender<ViewEvent>) -> Self {
        Self { client, events }
    }

    /// Ask the host to switch views
    pub fn navigate(&self, target: NavTarget) {
        debug!("Navigation requested: {}", target);
        self.emit(ViewEvent::Navigate(target));
    }

    pub fn emit(&self, event: ViewEvent) {
        emit_to(&self.events, event);
    }

    pub(crate) fn sender(&self) -> UnboundedSender<ViewEvent> {
        self.events.clone()
    }
}

/// Send an event, tolerating a host that has already shut down
pub(crate) fn emit_to(events: &UnboundedSender<ViewEvent>, event: ViewEvent) {
    if let Err(e) = events.send(event) {
        debug!("View event dropped, host is gone: {:?}", e.0);
    }
}
