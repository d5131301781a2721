use crate::model::{Disease, Patient};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated diagnostic: a patient sample matched against one or more
/// diseases. Never materialized with an empty `matches` list (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: Uuid,
    pub sample_date: NaiveDate,
    pub sample_sequence: String,
    pub patient: Patient,
    pub matches: Vec<Disease>,
}

impl Diagnostic {
    pub fn new(
        id: Uuid,
        sample_date: NaiveDate,
        sample_sequence: String,
        patient: Patient,
        matches: Vec<Disease>,
    ) -> Self {
        Self {
            id,
            sample_date,
            sample_sequence,
            patient,
            matches,
        }
    }

    /// The canonical sample content hashed to produce the content-addressed
    /// sample filename: `>document|date\nSEQUENCE`.
    pub fn canonical_sample_content(document: &str, date: NaiveDate, sequence: &str) -> String {
        format!(">{document}|{date}\n{sequence}")
    }
}
