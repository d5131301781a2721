//! Diagnosis pipeline (spec.md §4.4.3): field validation, patient lookup,
//! duplicate-sample gate, disease matching, and the cascading side effects
//! (generated diagnostics, high-infectivity report, mutation history).

use crate::body::DiagnoseRequest;
use crate::integrity;
use crate::model::{change_segments, Diagnostic, Disease, HighInfectivityRow, MutationRow, Patient};
use crate::store::{DiagnosisStore, DiseaseStore, HistoryStore, PatientStore, ReportStore};
use crate::BioGuardError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

fn document_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,20}$").expect("valid regex"))
}

fn sequence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ACGT]+$").expect("valid regex"))
}

/// The outcome of a successful diagnosis: the generated diagnostic plus the
/// ordered list of operation messages produced by its side effects.
#[derive(Debug, Clone)]
pub struct DiagnosisOutcome {
    pub diagnostic: Diagnostic,
    pub operation_messages: Vec<String>,
}

pub struct DiagnosisService<'a> {
    patients: &'a PatientStore,
    diseases: &'a DiseaseStore,
    diagnoses: &'a DiagnosisStore,
    reports: &'a ReportStore,
    history: &'a HistoryStore,
}

impl<'a> DiagnosisService<'a> {
    pub fn new(
        patients: &'a PatientStore,
        diseases: &'a DiseaseStore,
        diagnoses: &'a DiagnosisStore,
        reports: &'a ReportStore,
        history: &'a HistoryStore,
    ) -> Self {
        Self {
            patients,
            diseases,
            diagnoses,
            reports,
            history,
        }
    }

    /// Validate every field, collecting all violations into a single
    /// `Validation` error (spec.md §4.4.3 step 1 is explicit that this is
    /// an all-at-once check, not fail-fast per field).
    fn validate_fields(request: &DiagnoseRequest) -> Result<NaiveDate, BioGuardError> {
        let mut violations = Vec::new();

        if !document_re().is_match(&request.document) {
            violations.push("document");
        }

        let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d");
        if date.is_err() {
            violations.push("sampleDate");
        }

        if !(7..=5000).contains(&request.sequence.len()) || !sequence_re().is_match(&request.sequence)
        {
            violations.push("sampleSequence");
        }

        if violations.is_empty() {
            Ok(date.expect("checked above"))
        } else {
            Err(BioGuardError::Validation(format!(
                "invalid fields: {}",
                violations.join(", ")
            )))
        }
    }

    pub fn diagnose(&self, request: DiagnoseRequest) -> Result<DiagnosisOutcome, BioGuardError> {
        let date = Self::validate_fields(&request)?;

        let patient = self
            .patients
            .get_by_document(&request.document)?
            .ok_or_else(|| {
                BioGuardError::NotFound(format!("no patient with document {}", request.document))
            })?;
        let patient_id = patient.id.ok_or_else(|| {
            BioGuardError::NotFound(format!(
                "patient with document {} is missing an identifier",
                request.document
            ))
        })?;

        if self.diagnoses.exists_by_patient_and_sample(
            patient_id,
            &request.document,
            date,
            &request.sequence,
        )? {
            return Err(BioGuardError::Conflict(format!(
                "sample already diagnosed for patient {} on {date}",
                request.document
            )));
        }

        let matches = self.matching_diseases(&request.sequence)?;
        if matches.is_empty() {
            return Err(BioGuardError::NotFound(
                "sample sequence matches no registered disease".to_string(),
            ));
        }

        let diagnostic = Diagnostic::new(
            Uuid::new_v4(),
            date,
            request.sequence.clone(),
            patient.clone(),
            matches.clone(),
        );

        let mut operation_messages = vec![format!("enfermedades_detectadas: {}", matches.len())];

        // 7a: generated diagnostics.
        self.diagnoses.save(&diagnostic)?;

        // 7b: high-infectivity report, only if the ALTA threshold is met.
        if let Some(row) = HighInfectivityRow::from_matches(&request.document, &matches) {
            self.reports.append(&row)?;
            operation_messages.push("criterio_alta_infecciosidad: cumple (>= 3)".to_string());
        }

        // 7c: mutation history against every prior sample, excluding the one
        // just written.
        if let Some(message) = self.update_mutation_history(patient_id, &diagnostic)? {
            operation_messages.push(message);
        }

        Ok(DiagnosisOutcome {
            diagnostic,
            operation_messages,
        })
    }

    /// Diseases whose genetic sequence contains the sample sequence, in
    /// store scan order (spec.md §4.4.3 step 6 doesn't require sorting).
    fn matching_diseases(&self, sample_sequence: &str) -> Result<Vec<Disease>, BioGuardError> {
        Ok(self
            .diseases
            .find_all()?
            .into_iter()
            .filter(|d| d.genetic_sequence.contains(sample_sequence))
            .collect())
    }

    /// Build and persist the mutation-history CSV for `diagnostic` against
    /// every other sample already on file for this patient. Returns the
    /// operation message if a history file was written (nothing is written
    /// when there were no prior samples to compare against).
    fn update_mutation_history(
        &self,
        patient_id: Uuid,
        diagnostic: &Diagnostic,
    ) -> Result<Option<String>, BioGuardError> {
        let sample_paths = self.diagnoses.list_sample_paths(patient_id)?;

        let mut rows: Vec<MutationRow> = Vec::new();
        for path in sample_paths {
            if integrity::verify_file(&path, ".fasta").is_err() {
                tracing::warn!("skipping corrupted prior sample {}", path.display());
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            let Some((previous_date, previous_sequence)) = parse_sample_file(&content) else {
                tracing::warn!("skipping unparseable prior sample {}", path.display());
                continue;
            };

            if previous_date == diagnostic.sample_date && previous_sequence == diagnostic.sample_sequence
            {
                continue;
            }

            let segments = change_segments(&diagnostic.sample_sequence, &previous_sequence);
            for (start, end, kind) in segments {
                rows.push(MutationRow {
                    previous_sample_date: previous_date,
                    start_index: start,
                    end_index: end,
                    change_kind: kind,
                });
            }
        }

        if rows.is_empty() {
            return Ok(None);
        }

        rows.sort_by_key(|r| r.previous_sample_date);

        self.history
            .save(patient_id, diagnostic.id, diagnostic.sample_date, &rows)?;

        Ok(Some("historial_muestras: actualizado".to_string()))
    }
}

/// Parse a persisted sample file's `>document|date\nSEQUENCE` content into
/// `(date, sequence)`.
fn parse_sample_file(content: &str) -> Option<(NaiveDate, String)> {
    let fields = crate::bio::fasta::parse_header(content.lines().next()?, 2)?;
    let date = NaiveDate::parse_from_str(&fields[1], "%Y-%m-%d").ok()?;
    let sequence = crate::bio::fasta::sequence_of(content);
    Some((date, sequence))
}
