//! Patient registration (spec.md §4.4.1): validates the gender field (the
//! one domain rule the parser can't check, since it needs the typed enum)
//! and delegates the rest to the store boundary.

use crate::body::PatientRequest;
use crate::model::{Gender, Patient};
use crate::store::PatientStore;
use crate::BioGuardError;

pub struct PatientService<'a> {
    store: &'a PatientStore,
}

impl<'a> PatientService<'a> {
    pub fn new(store: &'a PatientStore) -> Self {
        Self { store }
    }

    pub fn register(&self, request: PatientRequest) -> Result<Patient, BioGuardError> {
        let gender = Gender::parse(&request.gender_raw).ok_or_else(|| {
            BioGuardError::Validation(format!("invalid gender: {}", request.gender_raw))
        })?;

        let patient = Patient {
            id: None,
            document: request.document,
            first_name: request.first_name,
            last_name: request.last_name,
            age: request.age,
            email: request.email,
            gender,
            city: request.city,
            country: request.country,
        };

        self.store.save(patient)
    }
}
