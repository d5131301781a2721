pub mod diagnose;
pub mod disease;
pub mod patient;

pub use diagnose::{parse_diagnose_body, DiagnoseRequest};
pub use disease::{parse_disease_body, DiseaseRequest};
pub use patient::{parse_patient_body, PatientRequest};

/// The only content-type the body parsers accept.
pub const FASTA_CONTENT_TYPE: &str = "application/fasta";
