pub mod diagnosis_service;
pub mod disease_service;
pub mod patient_service;

pub use diagnosis_service::{DiagnosisOutcome, DiagnosisService};
pub use disease_service::DiseaseService;
pub use patient_service::PatientService;
