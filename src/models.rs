use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Usuario")]
    Rider,
    #[serde(rename = "Conductor")]
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Rider => "Usuario",
            Role::Driver => "Conductor",
        }
    }

    pub fn all() -> [Role; 2] {
        [Role::Rider, Role::Driver]
    }

    /// Exact wire name only; `FromStr` also takes the command-line spellings
    pub fn from_wire(s: &str) -> Option<Role> {
        Role::all().into_iter().find(|role| role.as_str() == s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Usuario" | "usuario" | "rider" => Ok(Role::Rider),
            "Conductor" | "conductor" | "driver" => Ok(Role::Driver),
            other => Err(anyhow::anyhow!(
                "Unknown role '{}'. Use Usuario or Conductor",
                other
            )),
        }
    }
}

/// Flow a registration form is mounted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Create,
    Update,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Create => "Registro",
            Mode::Update => "Actualizar",
        }
    }
}

/// Caller identity handed to every view at mount time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub phone_number: String,
    pub role: Role,
}

impl Identity {
    pub fn new(phone_number: impl Into<String>, role: Role) -> Self {
        Self {
            phone_number: phone_number.into(),
            role,
        }
    }
}

/// Navigation targets understood by the host shell.
///
/// The string forms are the protocol the views speak: `Login` and
/// `Menu-<role>`. The remaining targets are only emitted by the shell's own
/// login and menu screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Login,
    Menu(Role),
    Register(Role),
    UpdateProfile,
    Trips,
}

impl NavTarget {
    /// Menu for the given role
    pub fn menu_for(role: Role) -> Self {
        NavTarget::Menu(role)
    }

    pub fn as_str(&self) -> String {
        match self {
            NavTarget::Login => "Login".to_string(),
            NavTarget::Menu(role) => format!("Menu-{}", role.as_str()),
            NavTarget::Register(role) => format!("Registro-{}", role.as_str()),
            NavTarget::UpdateProfile => "Actualizar".to_string(),
            NavTarget::Trips => "Viajes".to_string(),
        }
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl FromStr for NavTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Login" => Ok(NavTarget::Login),
            "Actualizar" => Ok(NavTarget::UpdateProfile),
            "Viajes" => Ok(NavTarget::Trips),
            _ => {
                let target = if let Some(role) = s.strip_prefix("Menu-") {
                    Role::from_wire(role).map(NavTarget::Menu)
                } else if let Some(role) = s.strip_prefix("Registro-") {
                    Role::from_wire(role).map(NavTarget::Register)
                } else {
                    None
                };
                target.ok_or_else(|| anyhow::anyhow!("Unknown navigation target '{}'", s))
            }
        }
    }
}

/// Trip record as returned by the backend.
///
/// Only `id` is interpreted; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Value,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Trip {
    /// Stable key for the trip, derived from its id
    pub fn key(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_target_string_protocol() {
        assert_eq!(NavTarget::Login.as_str(), "Login");
        assert_eq!(NavTarget::Menu(Role::Rider).as_str(), "Menu-Usuario");
        assert_eq!(NavTarget::Menu(Role::Driver).as_str(), "Menu-Conductor");

        let parsed: NavTarget = "Menu-Conductor".parse().unwrap();
        assert_eq!(parsed, NavTarget::Menu(Role::Driver));
        assert!("Menu-Pasajero".parse::<NavTarget>().is_err());
    }

    #[test]
    fn test_nav_target_parsing_is_canonical() {
        for spelling in ["Menu-rider", "Menu-usuario", "Registro-driver", "Menu-conductor"] {
            assert!(spelling.parse::<NavTarget>().is_err(), "{} should not parse", spelling);
        }
        for target in [
            NavTarget::Login,
            NavTarget::Menu(Role::Rider),
            NavTarget::Register(Role::Driver),
            NavTarget::UpdateProfile,
            NavTarget::Trips,
        ] {
            assert_eq!(target.as_str().parse::<NavTarget>().unwrap(), target);
        }

        // command-line input stays forgiving
        assert_eq!("driver".parse::<Role>().unwrap(), Role::Driver);
        assert_eq!(Role::from_wire("driver"), None);
    }

    #[test]
    fn test_trip_keeps_unknown_fields() {
        let trip: Trip = serde_json::from_str(
            r#"{"id": 7, "origen": "Calle 5", "destino": "Carrera 80", "valor": 12000}"#,
        )
        .unwrap();
        assert_eq!(trip.key(), "7");
        assert_eq!(trip.details.len(), 3);

        let round = serde_json::to_value(&trip).unwrap();
        assert_eq!(round["origen"], "Calle 5");
        assert_eq!(round["id"], 7);
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::Driver).unwrap(), "Conductor");
        assert_eq!("Usuario".parse::<Role>().unwrap(), Role::Rider);
    }
}
