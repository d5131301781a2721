//! Mutation-history store (C7): one CSV per diagnosis, built from the
//! change-segment algorithm against every prior sample.

use crate::model::MutationRow;
use crate::BioGuardError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const HEADER: &str = "fecha_muestra,posicion_inicio_cambio,posicion_inicio_fin_cambio,tipo_cambio";

pub struct HistoryStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, BioGuardError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    /// Write the per-diagnosis history CSV, rows already sorted ascending
    /// by `previous_sample_date` (the caller is responsible for sorting;
    /// spec.md says invalid dates sort last, which only the caller, who
    /// parsed the dates, can know about).
    pub fn save(
        &self,
        patient_id: Uuid,
        diagnostic_id: Uuid,
        date: chrono::NaiveDate,
        rows: &[MutationRow],
    ) -> Result<(), BioGuardError> {
        let _guard = self.lock.lock();

        let dir = self.root.join(patient_id.to_string()).join("history");
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{date}_{diagnostic_id}.csv"));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(std::fs::File::create(&path)?);
        writer.write_record(HEADER.split(','))?;

        for row in rows {
            writer.write_record(&[
                row.previous_sample_date.to_string(),
                row.start_index.to_string(),
                row.end_index.to_string(),
                row.change_kind.as_str().to_string(),
            ])?;
        }
        writer.flush()?;

        Ok(())
    }
}
