//! High-infectivity report store (C6): a single append-only consolidated
//! CSV. The header spelling (`cantiad`, `altmanete`) is part of the
//! external contract and preserved verbatim (spec.md §4.6).

use crate::model::HighInfectivityRow;
use crate::BioGuardError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

const HEADER: &str = "documento,total_virus_detectados,cantiad_virus_altamente_infecciosos,lista_virus_contagio_normal_o_medio,lista_virus_altmanete_infecciosos";

pub struct ReportStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ReportStore {
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
        if existing.lines().next() == Some(HEADER) {
            return Ok(());
        }
        let new_content = format!("{HEADER}\n{existing}");
        std::fs::write(&self.path, new_content)?;
        Ok(())
    }

    /// Append one row. Writes nothing when the caller determined the
    /// threshold wasn't met (callers only invoke this with a row produced
    /// by `HighInfectivityRow::from_matches`).
    pub fn append(&self, row: &HighInfectivityRow) -> Result<(), BioGuardError> {
        let _guard = self.lock.lock();

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(std::fs::OpenOptions::new().append(true).open(&self.path)?);

        writer.write_record(&[
            row.document.clone(),
            row.total_detected.to_string(),
            row.alta_count.to_string(),
            row.non_alta_names.join("|"),
            row.alta_names.join("|"),
        ])?;
        writer.flush()?;
        Ok(())
    }
}
