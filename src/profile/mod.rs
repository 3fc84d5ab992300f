//! Rider and driver profile data
//!
//! This module holds the editable field set behind the registration form:
//! the typed records sent to the backend, the enumerated values with their
//! wire codes, and the per-(role, mode) layout of inputs.

pub mod fields;
pub mod layout;
pub mod selection;

pub use fields::{DriverProfile, FieldName, PersonalFields, Profile, RiderProfile};
pub use layout::{ChoiceOption, FieldDescriptor, FieldKind, FieldSection, FieldSetSpec};
pub use selection::{Choice, Gender, ManufactureYear, Selection, TrunkSize};
