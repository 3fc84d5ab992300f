//! Profile records edited by the registration form
//!
//! Field names on the wire are the backend's (`cellphone`, `nombre`,
//! `placa`, ...). Keys the backend returns that are not modelled here are
//! kept in `extra` and sent back untouched.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::selection::{Gender, ManufactureYear, Selection, TrunkSize};
use crate::models::Role;

/// Every input the registration form knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    Phone,
    Password,
    FirstName,
    LastName,
    Gender,
    Address,
    Card,
    Plate,
    Model,
    Make,
    Trunk,
    Year,
    Insurance,
    /// Driver-update selector over already registered plates
    Vehicle,
}

impl FieldName {
    pub const ALL: [FieldName; 14] = [
        FieldName::Phone,
        FieldName::Password,
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Gender,
        FieldName::Address,
        FieldName::Card,
        FieldName::Plate,
        FieldName::Model,
        FieldName::Make,
        FieldName::Trunk,
        FieldName::Year,
        FieldName::Insurance,
        FieldName::Vehicle,
    ];

    /// Name of the input control, as used by edit events
    pub fn input_name(&self) -> &'static str {
        match self {
            FieldName::Phone => "cellphone",
            FieldName::Password => "password",
            FieldName::FirstName => "nombre",
            FieldName::LastName => "apellido",
            FieldName::Gender => "genero",
            FieldName::Address => "direccion",
            FieldName::Card => "tarjeta",
            FieldName::Plate => "placa",
            FieldName::Model => "modelo",
            FieldName::Make => "marca",
            FieldName::Trunk => "baul",
            FieldName::Year => "year",
            FieldName::Insurance => "soat",
            FieldName::Vehicle => "auto",
        }
    }

    pub fn from_input_name(name: &str) -> Option<FieldName> {
        // the year input stores into `fecha`; accept both spellings
        if name == "fecha" {
            return Some(FieldName::Year);
        }
        FieldName::ALL
            .into_iter()
            .find(|field| field.input_name() == name)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

/// Text column as the backend stores it: `null` reads as empty, numbers and
/// booleans as their decimal/literal form
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(TextVisitor)
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }
}

/// Personal data shared by riders and drivers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalFields {
    #[serde(rename = "cellphone", deserialize_with = "text")]
    pub phone: String,
    #[serde(deserialize_with = "text")]
    pub password: String,
    #[serde(rename = "nombre", deserialize_with = "text")]
    pub first_name: String,
    #[serde(rename = "apellido", deserialize_with = "text")]
    pub last_name: String,
    #[serde(rename = "genero")]
    pub gender: Selection<Gender>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderProfile {
    #[serde(flatten)]
    pub personal: PersonalFields,
    #[serde(rename = "direccion", deserialize_with = "text")]
    pub address: String,
    #[serde(rename = "tarjeta", deserialize_with = "text")]
    pub card: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverProfile {
    #[serde(flatten)]
    pub personal: PersonalFields,
    #[serde(rename = "placa", deserialize_with = "text")]
    pub plate: String,
    #[serde(rename = "modelo", deserialize_with = "text")]
    pub model: String,
    #[serde(rename = "marca", deserialize_with = "text")]
    pub make: String,
    #[serde(rename = "baul")]
    pub trunk: Selection<TrunkSize>,
    #[serde(rename = "fecha")]
    pub year: Selection<ManufactureYear>,
    #[serde(rename = "soat", deserialize_with = "text")]
    pub insurance: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The field set of one mounted form: exactly one variant, picked by role
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Rider(RiderProfile),
    Driver(DriverProfile),
}

impl Profile {
    /// Empty profile with every selection at its unset sentinel
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Rider => Profile::Rider(RiderProfile::default()),
            Role::Driver => Profile::Driver(DriverProfile::default()),
        }
    }

    /// Build a profile from the object returned by the backend
    pub fn from_fetched(role: Role, fetched: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let value = Value::Object(fetched);
        Ok(match role {
            Role::Rider => Profile::Rider(serde_json::from_value(value)?),
            Role::Driver => Profile::Driver(serde_json::from_value(value)?),
        })
    }

    pub fn role(&self) -> Role {
        match self {
            Profile::Rider(_) => Role::Rider,
            Profile::Driver(_) => Role::Driver,
        }
    }

    pub fn personal(&self) -> &PersonalFields {
        match self {
            Profile::Rider(rider) => &rider.personal,
            Profile::Driver(driver) => &driver.personal,
        }
    }

    pub fn personal_mut(&mut self) -> &mut PersonalFields {
        match self {
            Profile::Rider(rider) => &mut rider.personal,
            Profile::Driver(driver) => &mut driver.personal,
        }
    }

    /// Current wire value of a field, `None` if this variant has no such field
    pub fn value(&self, field: FieldName) -> Option<String> {
        let personal = self.personal();
        let value = match (field, self) {
            (FieldName::Phone, _) => personal.phone.clone(),
            (FieldName::Password, _) => personal.password.clone(),
            (FieldName::FirstName, _) => personal.first_name.clone(),
            (FieldName::LastName, _) => personal.last_name.clone(),
            (FieldName::Gender, _) => personal.gender.code(),
            (FieldName::Address, Profile::Rider(rider)) => rider.address.clone(),
            (FieldName::Card, Profile::Rider(rider)) => rider.card.clone(),
            (FieldName::Plate | FieldName::Vehicle, Profile::Driver(driver)) => {
                driver.plate.clone()
            }
            (FieldName::Model, Profile::Driver(driver)) => driver.model.clone(),
            (FieldName::Make, Profile::Driver(driver)) => driver.make.clone(),
            (FieldName::Trunk, Profile::Driver(driver)) => driver.trunk.code(),
            (FieldName::Year, Profile::Driver(driver)) => driver.year.code(),
            (FieldName::Insurance, Profile::Driver(driver)) => driver.insurance.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Store a wire value into one field.
    ///
    /// Returns `false` when the variant has no such field or a selection code
    /// is not one of its options; the profile is left untouched in that case.
    pub fn set(&mut self, field: FieldName, value: &str) -> bool {
        match (field, self) {
            (FieldName::Phone, profile) => profile.personal_mut().phone = value.to_string(),
            (FieldName::Password, profile) => {
                profile.personal_mut().password = value.to_string()
            }
            (FieldName::FirstName, profile) => {
                profile.personal_mut().first_name = value.to_string()
            }
            (FieldName::LastName, profile) => {
                profile.personal_mut().last_name = value.to_string()
            }
            (FieldName::Gender, profile) => match Selection::<Gender>::from_code(value) {
                Selection::Chosen(gender) => {
                    profile.personal_mut().gender = Selection::Chosen(gender)
                }
                Selection::Unset => return false,
            },
            (FieldName::Address, Profile::Rider(rider)) => rider.address = value.to_string(),
            (FieldName::Card, Profile::Rider(rider)) => rider.card = value.to_string(),
            (FieldName::Plate | FieldName::Vehicle, Profile::Driver(driver)) => {
                driver.plate = value.to_string()
            }
            (FieldName::Model, Profile::Driver(driver)) => driver.model = value.to_string(),
            (FieldName::Make, Profile::Driver(driver)) => driver.make = value.to_string(),
            (FieldName::Trunk, Profile::Driver(driver)) => match Selection::<TrunkSize>::from_code(value) {
                Selection::Chosen(trunk) => driver.trunk = Selection::Chosen(trunk),
                Selection::Unset => return false,
            },
            (FieldName::Year, Profile::Driver(driver)) => {
                match Selection::<ManufactureYear>::from_code(value) {
                    Selection::Chosen(year) => driver.year = Selection::Chosen(year),
                    Selection::Unset => return false,
                }
            }
            (FieldName::Insurance, Profile::Driver(driver)) => {
                driver.insurance = value.to_string()
            }
            _ => return false,
        }
        true
    }

    /// JSON body sent on insert/update: every field plus the caller's role
    pub fn to_request_body(&self) -> Result<Value, serde_json::Error> {
        let mut body = match self {
            Profile::Rider(rider) => serde_json::to_value(rider)?,
            Profile::Driver(driver) => serde_json::to_value(driver)?,
        };
        if let Value::Object(map) = &mut body {
            map.insert(
                "user".to_string(),
                Value::String(self.role().as_str().to_string()),
            );
        }
        Ok(body)
    }
}
