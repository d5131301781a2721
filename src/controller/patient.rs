//! Patient registration controller (C11).

use super::require_fasta_content_type;
use crate::body::parse_patient_body;
use crate::service::PatientService;
use crate::BioGuardError;

/// Handle a `POST:patient` request, returning the full wire response string.
/// `Conflict` (duplicate document) is remapped to a `400 ValidationError`
/// here rather than the generic `409 Conflict` used by the other
/// controllers (spec.md §9 open question, resolved for this controller
/// only — see scenario 2).
pub fn handle_patient(content_type: &str, body: &str, store: &PatientService) -> String {
    match run(content_type, body, store) {
        Ok(response) => response,
        Err(err) => super::error_response(&remap(err)),
    }
}

fn run(content_type: &str, body: &str, service: &PatientService) -> Result<String, BioGuardError> {
    require_fasta_content_type(content_type)?;
    let request = parse_patient_body(body)?;
    service.register(request)?;
    Ok("[TCP][201][Created]".to_string())
}

fn remap(err: BioGuardError) -> BioGuardError {
    match err {
        BioGuardError::Conflict(msg) => BioGuardError::Validation(msg),
        other => other,
    }
}
