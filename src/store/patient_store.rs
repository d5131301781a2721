//! Patient store (C3): a single CSV file, unique by document.

use crate::model::patient::normalize_spacing;
use crate::model::{Gender, Patient};
use crate::BioGuardError;
use parking_lot::Mutex;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

const HEADER: &str =
    "patientUuid,patientDocument,firstName,lastName,age,email,gender,city,country";

fn document_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,20}$").expect("valid regex"))
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[\p{L}]+( [\p{L}]+)*$").expect("valid regex")
    })
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"))
}

/// Strip control characters, CSV metacharacters (`,` and `"`), and collapse
/// whitespace runs to a single space (spec.md §4.6).
fn sanitize(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|&c| {
            let code = c as u32;
            !(code < 0x20 || code == 0x7f || c == ',' || c == '"')
        })
        .collect();
    normalize_spacing(&stripped)
}

pub struct PatientStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PatientStore {
    /// Create the store rooted at `path`, writing the header if the file is
    /// missing/empty, or prepending it if the file exists without the
    /// correct first line.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, BioGuardError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        store.ensure_header()?;
        Ok(store)
    }

    fn ensure_header(&self) -> Result<(), BioGuardError> {
        let _guard = self.lock.lock();
        let existing = std::fs::read_to_string(&self.path).unwrap_or_default();
        let first_line = existing.lines().next();

        if first_line == Some(HEADER) {
            return Ok(());
        }

        let rest = existing;
        let new_content = format!("{HEADER}\n{rest}");
        std::fs::write(&self.path, new_content)?;
        Ok(())
    }

    fn validate(&self, patient: &Patient) -> Result<(), BioGuardError> {
        let mut violations = Vec::new();

        if !document_re().is_match(&patient.document) {
            violations.push("document");
        }
        if !name_re().is_match(&normalize_spacing(&patient.first_name)) {
            violations.push("firstName");
        }
        if !name_re().is_match(&normalize_spacing(&patient.last_name)) {
            violations.push("lastName");
        }
        if !(1..=120).contains(&patient.age) {
            violations.push("age");
        }
        if !email_re().is_match(&patient.email) {
            violations.push("email");
        }
        if !name_re().is_match(&normalize_spacing(&patient.city)) {
            violations.push("city");
        }
        if !name_re().is_match(&normalize_spacing(&patient.country)) {
            violations.push("country");
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(BioGuardError::Validation(format!(
                "invalid fields: {}",
                violations.join(", ")
            )))
        }
    }

    /// Validate, reject duplicate documents, assign an id if absent, and
    /// append a single normalized CSV row. Returns the persisted patient.
    pub fn save(&self, mut patient: Patient) -> Result<Patient, BioGuardError> {
        self.validate(&patient)?;

        let _guard = self.lock.lock();

        if self.find_by_document_locked(&patient.document)?.is_some() {
            return Err(BioGuardError::Conflict(format!(
                "patient with document {} already exists",
                patient.document
            )));
        }

        if patient.id.is_none() {
            patient.id = Some(Uuid::new_v4());
        }
        let id = patient.id.expect("just assigned");
        let gender = patient.gender;

        let row = [
            id.to_string(),
            sanitize(&patient.document),
            sanitize(&patient.first_name),
            sanitize(&patient.last_name),
            patient.age.to_string(),
            sanitize(&patient.email),
            gender.as_stored_str().to_string(),
            sanitize(&patient.city),
            sanitize(&patient.country),
        ];

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(
                std::fs::OpenOptions::new()
                    .append(true)
                    .open(&self.path)?,
            );
        writer.write_record(&row)?;
        writer.flush()?;

        Ok(Patient {
            id: Some(id),
            document: row[1].clone(),
            first_name: row[2].clone(),
            last_name: row[3].clone(),
            age: patient.age,
            email: row[5].clone(),
            gender,
            city: row[7].clone(),
            country: row[8].clone(),
        })
    }

    /// Linear scan for a patient by document. Rows that fail to parse
    /// (wrong column count, unparseable UUID/age) are logged and skipped.
    pub fn get_by_document(&self, document: &str) -> Result<Option<Patient>, BioGuardError> {
        let _guard = self.lock.lock();
        self.find_by_document_locked(document)
    }

    fn find_by_document_locked(&self, document: &str) -> Result<Option<Patient>, BioGuardError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("corrupted patient row: {e}");
                    continue;
                }
            };

            if record.len() != 9 {
                tracing::warn!("corrupted patient row: expected 9 columns, got {}", record.len());
                continue;
            }

            if &record[1] != document {
                continue;
            }

            let id = match Uuid::parse_str(&record[0]) {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!("corrupted patient row: bad uuid {}", &record[0]);
                    continue;
                }
            };
            let age: i32 = match record[4].parse() {
                Ok(a) => a,
                Err(_) => {
                    tracing::warn!("corrupted patient row: bad age {}", &record[4]);
                    continue;
                }
            };
            let gender = Gender::parse(&record[6]).unwrap_or(Gender::NoEspecificado);

            return Ok(Some(Patient {
                id: Some(id),
                document: record[1].to_string(),
                first_name: record[2].to_string(),
                last_name: record[3].to_string(),
                age,
                email: record[5].to_string(),
                gender,
                city: record[7].to_string(),
                country: record[8].to_string(),
            }));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_patient() -> Patient {
        Patient {
            id: None,
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

    #[test]
    fn save_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = PatientStore::new(dir.path().join("patients.csv")).unwrap();
        let saved = store.save(sample_patient()).unwrap();
        assert!(saved.id.is_some());

        let fetched = store.get_by_document("12345678").unwrap().unwrap();
        assert_eq!(fetched.first_name, "Juan");
        assert_eq!(fetched.id, saved.id);
    }

    #[test]
    fn duplicate_document_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = PatientStore::new(dir.path().join("patients.csv")).unwrap();
        store.save(sample_patient()).unwrap();
        let err = store.save(sample_patient()).unwrap_err();
        assert!(matches!(err, BioGuardError::Conflict(_)));
    }

    #[test]
    fn age_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let store = PatientStore::new(dir.path().join("patients.csv")).unwrap();

        let mut low = sample_patient();
        low.document = "1".to_string();
        low.age = 1;
        assert!(store.save(low).is_ok());

        let mut high = sample_patient();
        high.document = "2".to_string();
        high.age = 120;
        assert!(store.save(high).is_ok());

        let mut zero = sample_patient();
        zero.document = "3".to_string();
        zero.age = 0;
        assert!(matches!(
            store.save(zero),
            Err(BioGuardError::Validation(_))
        ));

        let mut too_old = sample_patient();
        too_old.document = "4".to_string();
        too_old.age = 121;
        assert!(matches!(
            store.save(too_old),
            Err(BioGuardError::Validation(_))
        ));
    }

    #[test]
    fn header_is_restored_on_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        let _store = PatientStore::new(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(HEADER));
    }

    #[test]
    fn unknown_document_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PatientStore::new(dir.path().join("patients.csv")).unwrap();
        assert!(store.get_by_document("00000000").unwrap().is_none());
    }
}
