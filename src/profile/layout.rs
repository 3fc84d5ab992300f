//! Which inputs a registration form shows for each (role, mode) pair.
//!
//! The table lives here as data; screens render whatever descriptors they
//! are handed and never branch on role or mode themselves.

use super::fields::FieldName;
use super::selection::{Choice, Gender, ManufactureYear, TrunkSize};
use crate::models::{Mode, Role};

/// Plates a driver can switch to when updating their profile
pub const REGISTERED_PLATES: [&str; 3] = ["FDE142", "WEA753", "HDA123"];
const VEHICLE_UNSET_CODE: &str = "Select3";

/// One entry of a dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Choice {
        prompt: &'static str,
        unset_code: &'static str,
        options: Vec<ChoiceOption>,
    },
}

impl FieldKind {
    fn choice_of<T: Choice>() -> Self {
        FieldKind::Choice {
            prompt: T::PROMPT,
            unset_code: T::UNSET_CODE,
            options: T::options()
                .into_iter()
                .map(|option| ChoiceOption {
                    code: option.code(),
                    label: option.label(),
                })
                .collect(),
        }
    }

    fn registered_plates() -> Self {
        FieldKind::Choice {
            prompt: "Selecciona una placa:",
            unset_code: VEHICLE_UNSET_CODE,
            options: REGISTERED_PLATES
                .iter()
                .map(|plate| ChoiceOption {
                    code: plate.to_string(),
                    label: plate.to_string(),
                })
                .collect(),
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::Choice { .. })
    }

    /// Whether `code` may be stored through this control
    pub fn accepts(&self, code: &str) -> bool {
        match self {
            FieldKind::Choice { options, .. } => options.iter().any(|o| o.code == code),
            _ => true,
        }
    }

    /// Label shown for the given stored value
    pub fn display(&self, value: &str) -> String {
        match self {
            FieldKind::Choice {
                prompt, options, ..
            } => options
                .iter()
                .find(|o| o.code == value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| prompt.to_string()),
            FieldKind::Secret => "*".repeat(value.chars().count()),
            FieldKind::Text => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: FieldName,
    pub label: &'static str,
    pub kind: FieldKind,
    pub editable: bool,
    /// Shown with a `*`; the backend is the one enforcing it
    pub required: bool,
}

impl FieldDescriptor {
    fn new(field: FieldName, label: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            label,
            kind,
            editable: true,
            required: false,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Label with the required marker appended
    pub fn placeholder(&self) -> String {
        if self.required {
            format!("{}*", self.label)
        } else {
            self.label.to_string()
        }
    }
}

/// Section heading plus the descriptors it groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSection {
    pub title: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

/// Ordered field layout for one (role, mode) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSetSpec {
    pub role: Role,
    pub mode: Mode,
    pub sections: Vec<FieldSection>,
}

impl FieldSetSpec {
    pub fn for_variant(role: Role, mode: Mode) -> Self {
        let mut personal = personal_fields(mode);
        let mut sections = Vec::new();

        match (role, mode) {
            (Role::Rider, _) => {
                personal.push(FieldDescriptor::new(
                    FieldName::Address,
                    "Direccion De Residencia",
                    FieldKind::Text,
                ));
                personal.push(FieldDescriptor::new(
                    FieldName::Card,
                    "Tarjeta de credito",
                    FieldKind::Text,
                ));
                sections.push(FieldSection {
                    title: "Datos Personales",
                    fields: personal,
                });
            }
            (Role::Driver, Mode::Create) => {
                sections.push(FieldSection {
                    title: "Datos Personales",
                    fields: personal,
                });
                sections.push(FieldSection {
                    title: "Datos del Automovil",
                    fields: vec![
                        FieldDescriptor::new(FieldName::Plate, "Placa", FieldKind::Text)
                            .required(),
                        FieldDescriptor::new(FieldName::Model, "Modelo", FieldKind::Text)
                            .required(),
                        FieldDescriptor::new(FieldName::Make, "Marca", FieldKind::Text)
                            .required(),
                        FieldDescriptor::new(
                            FieldName::Trunk,
                            "Baul",
                            FieldKind::choice_of::<TrunkSize>(),
                        ),
                        FieldDescriptor::new(
                            FieldName::Year,
                            "Fecha de fabricacion",
                            FieldKind::choice_of::<ManufactureYear>(),
                        ),
                        FieldDescriptor::new(FieldName::Insurance, "Soat", FieldKind::Text),
                    ],
                });
            }
            (Role::Driver, Mode::Update) => {
                sections.push(FieldSection {
                    title: "Datos Personales",
                    fields: personal,
                });
                sections.push(FieldSection {
                    title: "Autos disponibles por si deseas cambiar",
                    fields: vec![FieldDescriptor::new(
                        FieldName::Vehicle,
                        "Placa",
                        FieldKind::registered_plates(),
                    )],
                });
            }
        }

        Self {
            role,
            mode,
            sections,
        }
    }

    /// All descriptors in render order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field_names(&self) -> Vec<FieldName> {
        self.fields().map(|descriptor| descriptor.field).collect()
    }

    pub fn descriptor(&self, field: FieldName) -> Option<&FieldDescriptor> {
        self.fields().find(|descriptor| descriptor.field == field)
    }

    pub fn len(&self) -> usize {
        self.fields().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn personal_fields(mode: Mode) -> Vec<FieldDescriptor> {
    let phone = FieldDescriptor::new(FieldName::Phone, "Celular", FieldKind::Text).required();
    let phone = match mode {
        Mode::Create => phone,
        Mode::Update => phone.read_only(),
    };

    vec![
        phone,
        FieldDescriptor::new(FieldName::Password, "Password", FieldKind::Secret).required(),
        FieldDescriptor::new(FieldName::FirstName, "Nombre(s)", FieldKind::Text).required(),
        FieldDescriptor::new(FieldName::LastName, "Apellido(s)", FieldKind::Text).required(),
        FieldDescriptor::new(FieldName::Gender, "Genero", FieldKind::choice_of::<Gender>()),
    ]
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, FieldSetSpec, REGISTERED_PLATES};
    use crate::models::{Mode, Role};
    use crate::profile::fields::FieldName::*;

    #[test]
    fn test_rider_variants() {
        for mode in [Mode::Create, Mode::Update] {
            let spec = FieldSetSpec::for_variant(Role::Rider, mode);
            assert_eq!(
                spec.field_names(),
                vec![Phone, Password, FirstName, LastName, Gender, Address, Card]
            );
        }
    }

    #[test]
    fn test_driver_create_variant() {
        let spec = FieldSetSpec::for_variant(Role::Driver, Mode::Create);
        assert_eq!(
            spec.field_names(),
            vec![
                Phone, Password, FirstName, LastName, Gender, Plate, Model, Make, Trunk, Year,
                Insurance
            ]
        );
        assert_eq!(spec.sections.len(), 2);
    }

    #[test]
    fn test_driver_update_variant() {
        let spec = FieldSetSpec::for_variant(Role::Driver, Mode::Update);
        assert_eq!(
            spec.field_names(),
            vec![Phone, Password, FirstName, LastName, Gender, Vehicle]
        );
        let FieldKind::Choice { options, .. } = &spec.descriptor(Vehicle).unwrap().kind else {
            panic!("vehicle selector should be a choice");
        };
        let plates: Vec<&str> = options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(plates, REGISTERED_PLATES);
    }

    #[test]
    fn test_phone_read_only_only_in_update() {
        for role in Role::all() {
            let create = FieldSetSpec::for_variant(role, Mode::Create);
            let update = FieldSetSpec::for_variant(role, Mode::Update);
            assert!(create.descriptor(Phone).unwrap().editable);
            assert!(!update.descriptor(Phone).unwrap().editable);
            assert!(update
                .fields()
                .filter(|d| d.field != Phone)
                .all(|d| d.editable));
        }
    }

    #[test]
    fn test_placeholders_and_display() {
        let spec = FieldSetSpec::for_variant(Role::Rider, Mode::Create);
        assert_eq!(spec.descriptor(Phone).unwrap().placeholder(), "Celular*");
        assert_eq!(
            spec.descriptor(Address).unwrap().placeholder(),
            "Direccion De Residencia"
        );

        let gender = &spec.descriptor(Gender).unwrap().kind;
        assert_eq!(gender.display("F"), "Femenino");
        assert_eq!(gender.display("Select"), "Selecciona un genero:");
        assert!(!gender.accepts("Select"));
        assert_eq!(FieldKind::Secret.display("abc"), "***");
    }
}
