use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External/internal gender enum. The wire form `NO ESPECIFICADO` maps to
/// the stored variant `NoEspecificado` (serialized as `NO_ESPECIFICADO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Masculino,
    Femenino,
    Otro,
    NoEspecificado,
}

impl Gender {
    /// Parse the external wire form (`MASCULINO`, `FEMENINO`, `OTRO`,
    /// `NO ESPECIFICADO`) into the typed enum.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "MASCULINO" => Some(Gender::Masculino),
            "FEMENINO" => Some(Gender::Femenino),
            "OTRO" => Some(Gender::Otro),
            "NO ESPECIFICADO" | "NO_ESPECIFICADO" => Some(Gender::NoEspecificado),
            _ => None,
        }
    }

    /// The normalized, stored form (`NO_ESPECIFICADO` for the no-answer case).
    pub fn as_stored_str(&self) -> &'static str {
        match self {
            Gender::Masculino => "MASCULINO",
            Gender::Femenino => "FEMENINO",
            Gender::Otro => "OTRO",
            Gender::NoEspecificado => "NO_ESPECIFICADO",
        }
    }
}

/// A registered patient. `id` is assigned at first persistence; callers
/// constructing a not-yet-saved patient pass `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Option<Uuid>,
    pub document: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub gender: Gender,
    pub city: String,
    pub country: String,
}

impl Patient {
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }
}

/// Collapse runs of whitespace to a single space and trim the ends. Used to
/// normalize names and locations before persistence.
pub fn normalize_spacing(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
