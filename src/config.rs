//! Key/value properties file loader (spec.md §6 "Configuration").
//! Mirrors the teacher's `core::config` module: a typed struct with a
//! `load` constructor, except here the source format is `key=value` lines
//! rather than TOML, per the external contract this service must honor.

use crate::BioGuardError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_port: u16,
    pub keystore_path: PathBuf,
    pub keystore_password: String,
    pub patients_csv_path: PathBuf,
    pub diseases_directory: PathBuf,
    pub diagnostics_directory: PathBuf,
    pub reports_directory: PathBuf,
}

const REQUIRED_KEYS: &[&str] = &[
    "server.port",
    "ssl.keystore.path",
    "ssl.keystore.password",
    "storage.csv.patients.path",
    "storage.diseases.directory",
    "storage.diagnostics.directory",
    "storage.reports.high_infectiousness.directory",
];

impl ServerConfig {
    /// Parse the `key=value` properties file at `path`. Missing or blank
    /// values for any required key fail fast with `BioGuardError::Validation`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BioGuardError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BioGuardError::Validation(format!(
                "cannot read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let mut values: HashMap<String, String> = HashMap::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        for key in REQUIRED_KEYS {
            match values.get(*key) {
                Some(v) if !v.is_empty() => {}
                _ => {
                    return Err(BioGuardError::Validation(format!(
                        "missing or blank required config key: {key}"
                    )))
                }
            }
        }

        let server_port: u16 = values["server.port"].parse().map_err(|_| {
            BioGuardError::Validation(format!(
                "server.port is not a valid port number: {}",
                values["server.port"]
            ))
        })?;

        Ok(Self {
            server_port,
            keystore_path: PathBuf::from(&values["ssl.keystore.path"]),
            keystore_password: values["ssl.keystore.password"].clone(),
            patients_csv_path: PathBuf::from(&values["storage.csv.patients.path"]),
            diseases_directory: PathBuf::from(&values["storage.diseases.directory"]),
            diagnostics_directory: PathBuf::from(&values["storage.diagnostics.directory"]),
            reports_directory: PathBuf::from(
                &values["storage.reports.high_infectiousness.directory"],
            ),
        })
    }
}
