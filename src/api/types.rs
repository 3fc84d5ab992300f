//! Request and response shapes exchanged with the ride-hailing backend

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::models::{Identity, Role, Trip};

/// Backend routes used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTrips,
    FetchProfile,
    UpdateProfile,
    InsertUser,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ListTrips => "/consultarViajes",
            Endpoint::FetchProfile => "/getDatos",
            Endpoint::UpdateProfile => "/actualizarDatos",
            Endpoint::InsertUser => "/insertarUser",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Body of the identity-keyed lookups (`/consultarViajes`, `/getDatos`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityQuery {
    pub cellphone: String,
    pub user: Role,
}

impl From<&Identity> for IdentityQuery {
    fn from(identity: &Identity) -> Self {
        Self {
            cellphone: identity.phone_number.clone(),
            user: identity.role,
        }
    }
}

/// First element of the `/consultarViajes` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripsEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub viajes: Vec<Trip>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Trip>, D::Error> {
    Option::<Vec<Trip>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// First element of the insert/update responses
#[derive(Debug, Clone, Deserialize)]
pub struct WriteAck {
    #[serde(rename = "bool", default)]
    pub accepted: bool,
}

/// What a profile write ended up as, for diagnostics only
#[derive(Debug)]
pub enum WriteOutcome {
    Accepted,
    Rejected,
    Failed(super::ApiError),
}

impl WriteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, WriteOutcome::Accepted)
    }
}

/// Which write a form submission performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
}

impl WriteKind {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            WriteKind::Insert => Endpoint::InsertUser,
            WriteKind::Update => Endpoint::UpdateProfile,
        }
    }

    /// Subject used in log lines ("Usuario actualizados exitosamente")
    pub fn subject(&self) -> &'static str {
        match self {
            WriteKind::Insert => "Usuario",
            WriteKind::Update => "Datos",
        }
    }
}
