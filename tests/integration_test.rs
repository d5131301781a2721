//! End-to-end router/store integration tests against a temp directory,
//! covering the literal scenarios and boundary-value table of spec.md §8.

use bioguard::controller::{handle_diagnose, handle_disease, handle_patient};
use bioguard::router::{self, Route};
use bioguard::service::{DiagnosisService, DiseaseService, PatientService};
use bioguard::store::{DiagnosisStore, DiseaseStore, HistoryStore, PatientStore, ReportStore};

struct Harness {
    dir: tempfile::TempDir,
    patients: PatientStore,
    diseases: DiseaseStore,
    diagnoses: DiagnosisStore,
    reports: ReportStore,
    history: HistoryStore,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self {
            patients: PatientStore::new(dir.path().join("patients.csv")).unwrap(),
            diseases: DiseaseStore::new(dir.path().join("diseases")).unwrap(),
            diagnoses: DiagnosisStore::new(dir.path().join("diagnostics")).unwrap(),
            reports: ReportStore::new(dir.path().join("report.csv")).unwrap(),
            history: HistoryStore::new(dir.path().join("history")).unwrap(),
            dir,
        }
    }

    /// Drive a raw wire frame through the router and the matching
    /// controller exactly like `transport::dispatch` does, using only this
    /// crate's public surface.
    fn send(&self, frame: &str) -> String {
        let request = match router::parse_frame(frame) {
            Ok(r) => r,
            Err(e) => return bioguard::controller::error_response(&e),
        };
        let route = match router::resolve(&request) {
            Ok(r) => r,
            Err(e) => return bioguard::controller::error_response(&e),
        };

        match route {
            Route::RegisterPatient => {
                let service = PatientService::new(&self.patients);
                handle_patient(&request.content_type, &request.body, &service)
            }
            Route::RegisterDisease => {
                let service = DiseaseService::new(&self.diseases);
                handle_disease(&request.content_type, &request.body, &service)
            }
            Route::Diagnose => {
                let service = DiagnosisService::new(
                    &self.patients,
                    &self.diseases,
                    &self.diagnoses,
                    &self.reports,
                    &self.history,
                );
                handle_diagnose(&request.content_type, &request.body, &service)
            }
        }
    }

    fn reports_path(&self) -> std::path::PathBuf {
        self.dir.path().join("report.csv")
    }
}

fn patient_frame(document: &str, age: i32) -> String {
    format!("POST patient\napplication/fasta\n>{document}|Juan|Perez|{age}|juan@mail.com|MASCULINO|Bogota|Colombia")
}

fn disease_frame(name: &str, level: &str, sequence: &str) -> String {
    format!("POST disease\napplication/fasta\n>{name}|{level}\n{sequence}")
}

fn diagnose_frame(document: &str, date: &str, sequence: &str) -> String {
    format!("POST diagnose\napplication/fasta\n>{document}|{date}\n{sequence}")
}

#[test]
fn scenario_1_patient_registration() {
    let h = Harness::new();
    let response = h.send(&patient_frame("12345678", 30));
    assert_eq!(response, "[TCP][201][Created]");
    assert!(h.patients.get_by_document("12345678").unwrap().is_some());
}

#[test]
fn scenario_2_duplicate_patient_is_400_validation_error() {
    let h = Harness::new();
    let first = h.send(&patient_frame("12345678", 30));
    assert_eq!(first, "[TCP][201][Created]");

    let second = h.send(&patient_frame("12345678", 30));
    assert!(second.starts_with("[TCP][400][ValidationError]"));
}

#[test]
fn scenario_3_disease_registration() {
    let h = Harness::new();
    let sequence = "GAGTATGTGAATAGATATATATTAGTAGTAGTAAAGTT";
    let response = h.send(&disease_frame("ebola", "ALTA", sequence));
    assert_eq!(response, "[TCP][201][Created]");

    let diseases = h.diseases.find_all().unwrap();
    assert_eq!(diseases.len(), 1);
    assert_eq!(diseases[0].name, "ebola");
}

#[test]
fn scenario_4_diagnosis_with_single_match() {
    let h = Harness::new();
    h.send(&patient_frame("12345678", 30));
    h.send(&disease_frame(
        "ebola",
        "ALTA",
        "GAGTATGTGAATAGATATATATTAGTAGTAGTAAAGTT",
    ));

    let response = h.send(&diagnose_frame("12345678", "2025-02-19", "GAGTATGTGAA"));
    assert_eq!(
        response,
        "[TCP][200][Success] diagnostico generado exitosamente | enfermedades_detectadas: 1"
    );
}

#[test]
fn scenario_5_diagnosis_triggers_high_infectivity() {
    let h = Harness::new();
    h.send(&patient_frame("99887766", 30));
    let shared_sequence = "ACGTACGTACGTACGTACGT";
    h.send(&disease_frame("virusA", "ALTA", shared_sequence));
    h.send(&disease_frame("virusB", "ALTA", shared_sequence));
    h.send(&disease_frame("virusC", "ALTA", shared_sequence));

    let response = h.send(&diagnose_frame("99887766", "2025-03-01", "ACGTACG"));
    assert!(response.contains("enfermedades_detectadas: 3"));
    assert!(response.contains("criterio_alta_infecciosidad: cumple (>= 3)"));

    let report = std::fs::read_to_string(h.reports_path()).unwrap();
    let data_lines: Vec<_> = report.lines().skip(1).collect();
    assert_eq!(data_lines.len(), 1);
}

#[test]
fn scenario_6_second_sample_triggers_mutation_history() {
    let h = Harness::new();
    h.send(&patient_frame("55554444", 30));
    h.send(&disease_frame(
        "ebola",
        "MEDIA",
        "GAGTATGTGAATAGATATATATTAGTAGTAGTAAAGTT",
    ));

    h.send(&diagnose_frame("55554444", "2025-02-19", "GAGTATGTGAA"));
    let response = h.send(&diagnose_frame("55554444", "2025-02-20", "AGAGTATGTGAA"));

    assert!(response.contains("historial_muestras: actualizado"));
}

#[test]
fn boundary_patient_age() {
    let h = Harness::new();
    assert_eq!(h.send(&patient_frame("1", 1)), "[TCP][201][Created]");
    assert_eq!(h.send(&patient_frame("2", 120)), "[TCP][201][Created]");
    assert!(h.send(&patient_frame("3", 0)).starts_with("[TCP][400]"));
    assert!(h.send(&patient_frame("4", 121)).starts_with("[TCP][400]"));
}

#[test]
fn boundary_disease_sequence_length() {
    let h = Harness::new();
    let short = "A".repeat(14);
    let exact = "A".repeat(15);
    assert!(h
        .send(&disease_frame("short", "ALTA", &short))
        .starts_with("[TCP][400]"));
    assert_eq!(
        h.send(&disease_frame("exact", "ALTA", &exact)),
        "[TCP][201][Created]"
    );
}

#[test]
fn boundary_diagnose_sequence_length() {
    let h = Harness::new();
    h.send(&patient_frame("77778888", 30));
    let long_disease = "A".repeat(5000);
    h.send(&disease_frame("long-virus", "BAJA", &long_disease));

    // 6 bases: below the 7-base minimum, rejected before any disease scan.
    let too_short = h.send(&diagnose_frame("77778888", "2025-01-01", "AAAAAA"));
    assert!(too_short.starts_with("[TCP][400][ValidationError]"));

    // 7 bases: at the minimum and contained in the registered disease.
    let at_minimum = h.send(&diagnose_frame("77778888", "2025-01-02", "AAAAAAA"));
    assert!(at_minimum.starts_with("[TCP][200][Success]"));

    // 5001 bases: above the 5000-base maximum, rejected regardless of content.
    let too_long = "A".repeat(5001);
    let over_maximum = h.send(&diagnose_frame("77778888", "2025-01-03", &too_long));
    assert!(over_maximum.starts_with("[TCP][400][ValidationError]"));
}
