use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Infectiousness level. External and stored forms coincide for diseases
/// (unlike `Gender`), so only the three-way enum is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Infectiousness {
    Alta,
    Media,
    Baja,
}

impl Infectiousness {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "ALTA" => Some(Infectiousness::Alta),
            "MEDIA" => Some(Infectiousness::Media),
            "BAJA" => Some(Infectiousness::Baja),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Infectiousness::Alta => "ALTA",
            Infectiousness::Media => "MEDIA",
            Infectiousness::Baja => "BAJA",
        }
    }
}

/// A registered disease. `genetic_sequence` is always stored upper-cased.
/// `id` is assigned at first persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    pub id: Option<Uuid>,
    pub name: String,
    pub infectiousness: Infectiousness,
    pub genetic_sequence: String,
}

impl Disease {
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// The canonical content hashed to produce the content-addressed
    /// filename: `>name|infectiousness\nSEQUENCE`. Deliberately excludes the
    /// id so identifier assignment never invalidates the filename
    /// (spec.md §9, canonical-vs-serialized divergence).
    pub fn canonical_content(&self) -> String {
        format!(
            ">{}|{}\n{}",
            self.name,
            self.infectiousness.as_str(),
            self.genetic_sequence
        )
    }

    /// The serialized file content, which additionally carries the opaque
    /// id: `>id|name|infectiousness\nSEQUENCE`.
    pub fn serialized_content(&self) -> Option<String> {
        let id = self.id?;
        Some(format!(
            ">{}|{}|{}\n{}",
            id,
            self.name,
            self.infectiousness.as_str(),
            self.genetic_sequence
        ))
    }
}
