//! Diagnosis store (C5): a per-patient tree of sample files and generated
//! diagnostic CSVs.

use crate::integrity;
use crate::model::Diagnostic;
use crate::BioGuardError;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SAMPLE_EXTENSION: &str = ".fasta";
const GENERATED_HEADER: &str = "uuid_diagnostico,fecha,uuid_virus,virus,posicion_inicio,posicion_fin";

pub struct DiagnosisStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl DiagnosisStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, BioGuardError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    fn samples_dir(&self, patient_id: Uuid) -> PathBuf {
        self.root.join(patient_id.to_string()).join("samples")
    }

    fn generated_dir(&self, patient_id: Uuid) -> PathBuf {
        self.root
            .join(patient_id.to_string())
            .join("generated_diagnostics")
    }

    /// Canonical sample hash for `(document, date, sequence)`.
    pub fn sample_hash(document: &str, date: NaiveDate, sequence: &str) -> String {
        integrity::hash(&Diagnostic::canonical_sample_content(document, date, sequence))
    }

    /// Whether the canonical tuple already exists as a sample file for this
    /// patient. Runs integrity verification on the candidate file before
    /// answering.
    pub fn exists_by_patient_and_sample(
        &self,
        patient_id: Uuid,
        document: &str,
        date: NaiveDate,
        sequence: &str,
    ) -> Result<bool, BioGuardError> {
        let _guard = self.lock.lock();
        let hash = Self::sample_hash(document, date, sequence);
        let path = self.samples_dir(patient_id).join(format!("{hash}{SAMPLE_EXTENSION}"));

        if !path.exists() {
            return Ok(false);
        }

        match integrity::verify_file(&path, SAMPLE_EXTENSION) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!("sample file {} failed integrity check: {e}", path.display());
                Ok(false)
            }
        }
    }

    /// Write the sample file (exclusive create; fails with `Conflict` if it
    /// already exists) and the per-diagnostic CSV (create-or-truncate).
    pub fn save(&self, diagnostic: &Diagnostic) -> Result<(), BioGuardError> {
        let _guard = self.lock.lock();

        let samples_dir = self.samples_dir(diagnostic.patient.id.expect("patient must be persisted"));
        let generated_dir =
            self.generated_dir(diagnostic.patient.id.expect("patient must be persisted"));
        std::fs::create_dir_all(&samples_dir)?;
        std::fs::create_dir_all(&generated_dir)?;

        let document = &diagnostic.patient.document;
        let hash = Self::sample_hash(document, diagnostic.sample_date, &diagnostic.sample_sequence);
        let sample_path = samples_dir.join(format!("{hash}{SAMPLE_EXTENSION}"));

        let content = Diagnostic::canonical_sample_content(
            document,
            diagnostic.sample_date,
            &diagnostic.sample_sequence,
        );

        use std::io::Write;
        let mut sample_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&sample_path)
            .map_err(|_| {
                BioGuardError::Conflict(format!("sample file already exists: {hash}"))
            })?;
        sample_file.write_all(content.as_bytes())?;

        let csv_path = generated_dir.join(format!("{}_{}.csv", diagnostic.sample_date, diagnostic.id));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(std::fs::File::create(&csv_path)?);
        writer.write_record(GENERATED_HEADER.split(','))?;

        for disease in &diagnostic.matches {
            // start_index is the position of the patient sequence inside
            // the disease sequence (spec.md §4.4.3 step 7a).
            let start_index = disease
                .genetic_sequence
                .find(&diagnostic.sample_sequence)
                .unwrap_or(0);
            let end_index = start_index + diagnostic.sample_sequence.len() - 1;

            writer.write_record(&[
                diagnostic.id.to_string(),
                diagnostic.sample_date.to_string(),
                disease.id.map(|i| i.to_string()).unwrap_or_default(),
                disease.name.clone(),
                start_index.to_string(),
                end_index.to_string(),
            ])?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Every sample file path currently stored for `patient_id`.
    pub fn list_sample_paths(&self, patient_id: Uuid) -> Result<Vec<PathBuf>, BioGuardError> {
        let _guard = self.lock.lock();
        let dir = self.samples_dir(patient_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("fasta") {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Disease, Gender, Infectiousness, Patient};

    fn patient() -> Patient {
        Patient {
            id: Some(Uuid::new_v4()),
            document: "12345678".to_string(),
            first_name: "Juan".to_string(),
            last_name: "Perez".to_string(),
            age: 30,
            email: "juan@mail.com".to_string(),
            gender: Gender::Masculino,
            city: "Bogota".to_string(),
            country: "Colombia".to_string(),
        }
    }

    fn matching_disease() -> Disease {
        Disease {
            id: Some(Uuid::new_v4()),
            name: "ebola".to_string(),
            infectiousness: Infectiousness::Alta,
            genetic_sequence: "GAGTATGTGAATAGATATATATTAGTAGTAGTAAAGTT".to_string(),
        }
    }

    #[test]
    fn save_writes_sample_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiagnosisStore::new(dir.path()).unwrap();
        let p = patient();
        let date = NaiveDate::from_ymd_opt(2025, 2, 19).unwrap();
        let diag = Diagnostic::new(
            Uuid::new_v4(),
            date,
            "GAGTATGTGAA".to_string(),
            p.clone(),
            vec![matching_disease()],
        );

        store.save(&diag).unwrap();

        assert!(store
            .exists_by_patient_and_sample(p.id.unwrap(), &p.document, date, "GAGTATGTGAA")
            .unwrap());

        let generated = store.generated_dir(p.id.unwrap());
        let entries: Vec<_> = std::fs::read_dir(generated).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn duplicate_sample_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiagnosisStore::new(dir.path()).unwrap();
        let p = patient();
        let date = NaiveDate::from_ymd_opt(2025, 2, 19).unwrap();
        let diag = Diagnostic::new(
            Uuid::new_v4(),
            date,
            "GAGTATGTGAA".to_string(),
            p.clone(),
            vec![matching_disease()],
        );
        store.save(&diag).unwrap();

        let diag2 = Diagnostic::new(Uuid::new_v4(), date, "GAGTATGTGAA".to_string(), p, vec![matching_disease()]);
        assert!(matches!(store.save(&diag2), Err(BioGuardError::Conflict(_))));
    }

    #[test]
    fn list_sample_paths_finds_written_sample() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiagnosisStore::new(dir.path()).unwrap();
        let p = patient();
        let date = NaiveDate::from_ymd_opt(2025, 2, 19).unwrap();
        let diag = Diagnostic::new(Uuid::new_v4(), date, "GAGTATGTGAA".to_string(), p.clone(), vec![matching_disease()]);
        store.save(&diag).unwrap();

        let paths = store.list_sample_paths(p.id.unwrap()).unwrap();
        assert_eq!(paths.len(), 1);
    }
}
