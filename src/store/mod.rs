pub mod diagnosis_store;
pub mod disease_store;
pub mod history_store;
pub mod patient_store;
pub mod report_store;

pub use diagnosis_store::DiagnosisStore;
pub use disease_store::DiseaseStore;
pub use history_store::HistoryStore;
pub use patient_store::PatientStore;
pub use report_store::ReportStore;
