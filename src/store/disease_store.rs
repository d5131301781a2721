//! Disease store (C4): a directory of hash-named FASTA files, one per
//! disease, content-addressed by the disease's canonical form.

use crate::integrity;
use crate::model::{Disease, Infectiousness};
use crate::BioGuardError;
use parking_lot::Mutex;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

const EXTENSION: &str = ".fasta";

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\p{L}0-9 ._-]+$").expect("valid regex"))
}

fn sequence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ACGT]+$").expect("valid regex"))
}

pub struct DiseaseStore {
    directory: PathBuf,
    lock: Mutex<()>,
}

impl DiseaseStore {
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, BioGuardError> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            lock: Mutex::new(()),
        })
    }

    fn validate(&self, disease: &Disease) -> Result<(), BioGuardError> {
        let mut violations = Vec::new();

        if !name_re().is_match(&disease.name) {
            violations.push("name");
        }
        if disease.genetic_sequence.len() < 15 || !sequence_re().is_match(&disease.genetic_sequence)
        {
            violations.push("geneticSequence");
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

    /// Validate, hash the canonical form, reject a duplicate canonical
    /// hash with `Conflict`, and write the file exclusively (fails if a
    /// file of that name already exists).
    pub fn save(&self, mut disease: Disease) -> Result<Disease, BioGuardError> {
        self.validate(&disease)?;

        let _guard = self.lock.lock();

        let canonical = disease.canonical_content();
        let hash = integrity::hash(&canonical);

        for existing in self.scan_locked()? {
            if integrity::hash(&existing.canonical_content()) == hash {
                return Err(BioGuardError::Conflict(format!(
                    "disease with this name/level/sequence already exists: {hash}"
                )));
            }
        }

        if disease.id.is_none() {
            disease.id = Some(Uuid::new_v4());
        }

        let path = self.directory.join(format!("{hash}{EXTENSION}"));
        let content = disease
            .serialized_content()
            .expect("id was just assigned");

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|_| {
                BioGuardError::Conflict(format!("disease file already exists: {hash}"))
            })?;
        use std::io::Write;
        file.write_all(content.as_bytes())?;

        Ok(disease)
    }

    /// Enumerate `.fasta` files; files that fail integrity verification or
    /// parsing are logged and skipped.
    pub fn find_all(&self) -> Result<Vec<Disease>, BioGuardError> {
        let _guard = self.lock.lock();
        self.scan_locked()
    }

    fn scan_locked(&self) -> Result<Vec<Disease>, BioGuardError> {
        let mut diseases = Vec::new();

        let entries = std::fs::read_dir(&self.directory)?;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("fasta") {
                continue;
            }

            if let Err(e) = integrity::verify_file(&path, EXTENSION) {
                tracing::warn!("skipping corrupted disease file {}: {e}", path.display());
                continue;
            }

            match Self::parse_file(&path) {
                Ok(disease) => diseases.push(disease),
                Err(e) => {
                    tracing::warn!("skipping unparseable disease file {}: {e}", path.display());
                }
            }
        }

        Ok(diseases)
    }

    fn parse_file(path: &Path) -> Result<Disease, BioGuardError> {
        let content = std::fs::read_to_string(path)?;
        let fields = crate::bio::fasta::parse_header(
            content.lines().next().unwrap_or_default(),
            3,
        )
        .ok_or_else(|| BioGuardError::CorruptedData(format!("bad header in {}", path.display())))?;

        let id = Uuid::parse_str(&fields[0])
            .map_err(|_| BioGuardError::CorruptedData(format!("bad id in {}", path.display())))?;
        let infectiousness = Infectiousness::parse(&fields[2])
            .ok_or_else(|| BioGuardError::CorruptedData(format!("bad level in {}", path.display())))?;
        let sequence = crate::bio::fasta::sequence_of(&content);

        Ok(Disease {
            id: Some(id),
            name: fields[1].clone(),
            infectiousness,
            genetic_sequence: sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ebola() -> Disease {
        Disease {
            id: None,
            name: "ebola".to_string(),
            infectiousness: Infectiousness::Alta,
            genetic_sequence: "GAGTATGTGAATAGATATATATTAGTAGTAGTAAAGTT".to_string(),
        }
    }

    #[test]
    fn save_creates_content_addressed_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiseaseStore::new(dir.path()).unwrap();
        let saved = store.save(ebola()).unwrap();

        let expected_hash = integrity::hash(&ebola().canonical_content());
        let path = dir.path().join(format!("{expected_hash}.fasta"));
        assert!(path.exists());
        assert!(saved.id.is_some());
    }

    #[test]
    fn duplicate_disease_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiseaseStore::new(dir.path()).unwrap();
        store.save(ebola()).unwrap();
        let err = store.save(ebola()).unwrap_err();
        assert!(matches!(err, BioGuardError::Conflict(_)));
    }

    #[test]
    fn sequence_length_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiseaseStore::new(dir.path()).unwrap();

        let mut short = ebola();
        short.name = "short".to_string();
        short.genetic_sequence = "A".repeat(14);
        assert!(matches!(
            store.save(short),
            Err(BioGuardError::Validation(_))
        ));

        let mut exact = ebola();
        exact.name = "exact".to_string();
        exact.genetic_sequence = "A".repeat(15);
        assert!(store.save(exact).is_ok());
    }

    #[test]
    fn find_all_skips_corrupted_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiseaseStore::new(dir.path()).unwrap();
        store.save(ebola()).unwrap();

        std::fs::write(dir.path().join("garbage.fasta"), "not a real file").unwrap();

        let all = store.find_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "ebola");
    }

    #[test]
    fn find_all_is_stable_under_permutation() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiseaseStore::new(dir.path()).unwrap();

        let mut a = ebola();
        a.name = "aaa".to_string();
        let mut b = ebola();
        b.name = "bbb".to_string();

        store.save(a).unwrap();
        store.save(b).unwrap();

        let names: std::collections::HashSet<_> =
            store.find_all().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            ["aaa", "bbb"].into_iter().map(String::from).collect()
        );
    }
}
