//! Enumerated profile values and their "nothing chosen yet" sentinels

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Most recent manufacture year offered by the year selector
pub const NEWEST_MODEL_YEAR: u16 = 2019;
/// Number of years offered, counting back from [`NEWEST_MODEL_YEAR`]
pub const MODEL_YEAR_SPAN: u16 = 40;

/// A closed set of values picked from a dropdown.
///
/// Each choice has a wire code (what the backend stores) and a label (what
/// the user sees). `UNSET_CODE` is the code sent while nothing is picked.
pub trait Choice: Sized + Copy + PartialEq + fmt::Debug {
    const UNSET_CODE: &'static str;
    const PROMPT: &'static str;

    fn options() -> Vec<Self>;
    fn code(&self) -> String;
    fn label(&self) -> String;

    fn from_code(code: &str) -> Option<Self> {
        Self::options().into_iter().find(|option| option.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Choice for Gender {
    const UNSET_CODE: &'static str = "Select";
    const PROMPT: &'static str = "Selecciona un genero:";

    fn options() -> Vec<Self> {
        vec![Gender::Male, Gender::Female, Gender::Unspecified]
    }

    fn code(&self) -> String {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unspecified => "N",
        }
        .to_string()
    }

    fn label(&self) -> String {
        match self {
            Gender::Male => "Masculino",
            Gender::Female => "Femenino",
            Gender::Unspecified => "No Definido",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrunkSize {
    Large,
    Small,
    None,
}

impl Choice for TrunkSize {
    const UNSET_CODE: &'static str = "Select2";
    const PROMPT: &'static str = "Selecciona un tipo de baul:";

    fn options() -> Vec<Self> {
        vec![TrunkSize::Large, TrunkSize::Small, TrunkSize::None]
    }

    fn code(&self) -> String {
        match self {
            TrunkSize::Large => "G",
            TrunkSize::Small => "P",
            TrunkSize::None => "N",
        }
        .to_string()
    }

    fn label(&self) -> String {
        match self {
            TrunkSize::Large => "Grande",
            TrunkSize::Small => "Pequeno",
            TrunkSize::None => "No tiene",
        }
        .to_string()
    }
}

/// Vehicle manufacture year, restricted to the offered window
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManufactureYear(u16);

impl ManufactureYear {
    pub fn new(year: u16) -> Option<Self> {
        let oldest = NEWEST_MODEL_YEAR - (MODEL_YEAR_SPAN - 1);
        (oldest..=NEWEST_MODEL_YEAR)
            .contains(&year)
            .then_some(ManufactureYear(year))
    }

    pub fn year(&self) -> u16 {
        self.0
    }
}

impl Choice for ManufactureYear {
    const UNSET_CODE: &'static str = "Select1";
    const PROMPT: &'static str = "Selecciona una fecha de fabricacion:";

    fn options() -> Vec<Self> {
        (0..MODEL_YEAR_SPAN)
            .map(|offset| ManufactureYear(NEWEST_MODEL_YEAR - offset))
            .collect()
    }

    fn code(&self) -> String {
        self.0.to_string()
    }

    fn label(&self) -> String {
        self.0.to_string()
    }

    fn from_code(code: &str) -> Option<Self> {
        code.trim().parse().ok().and_then(ManufactureYear::new)
    }
}

/// Either a picked choice or the unset sentinel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<T> {
    Unset,
    Chosen(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::Unset
    }
}

impl<T: Choice> Selection<T> {
    pub fn code(&self) -> String {
        match self {
            Selection::Unset => T::UNSET_CODE.to_string(),
            Selection::Chosen(value) => value.code(),
        }
    }

    pub fn chosen(&self) -> Option<T> {
        match self {
            Selection::Unset => None,
            Selection::Chosen(value) => Some(*value),
        }
    }

    /// Parse a wire code; the sentinel and unknown codes both yield `Unset`
    pub fn from_code(code: &str) -> Self {
        T::from_code(code).map_or(Selection::Unset, Selection::Chosen)
    }
}

impl<T: Choice> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

struct SelectionVisitor<T>(PhantomData<T>);

impl<'de, T: Choice> Visitor<'de> for SelectionVisitor<T> {
    type Value = Selection<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a selection code as string or integer")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Selection::from_code(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Selection::from_code(&value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Selection::from_code(&value.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Selection::Unset)
    }
}

impl<'de, T: Choice> Deserialize<'de> for Selection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SelectionVisitor(PhantomData))
    }
}
