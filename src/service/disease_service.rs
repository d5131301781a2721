//! Disease registration (spec.md §4.4.2): validates the infectiousness
//! level (the store boundary needs the typed enum) and delegates the rest.

use crate::body::DiseaseRequest;
use crate::model::{Disease, Infectiousness};
use crate::store::DiseaseStore;
use crate::BioGuardError;

pub struct DiseaseService<'a> {
    store: &'a DiseaseStore,
}

impl<'a> DiseaseService<'a> {
    pub fn new(store: &'a DiseaseStore) -> Self {
        Self { store }
    }

    pub fn register(&self, request: DiseaseRequest) -> Result<Disease, BioGuardError> {
        let infectiousness = Infectiousness::parse(&request.level_raw).ok_or_else(|| {
            BioGuardError::Validation(format!("invalid infectiousness level: {}", request.level_raw))
        })?;

        let disease = Disease {
            id: None,
            name: request.name,
            infectiousness,
            genetic_sequence: request.sequence,
        };

        self.store.save(disease)
    }
}
