//! Diagnosis controller (C11). Success responses append every operation
//! message produced by the pipeline's side effects, joined by ` | `
//! (spec.md §4.3).

use super::require_fasta_content_type;
use crate::body::parse_diagnose_body;
use crate::service::DiagnosisService;

pub fn handle_diagnose(content_type: &str, body: &str, service: &DiagnosisService) -> String {
    match run(content_type, body, service) {
        Ok(response) => response,
        Err(err) => super::error_response(&err),
    }
}

fn run(
    content_type: &str,
    body: &str,
    service: &DiagnosisService,
) -> Result<String, crate::BioGuardError> {
    require_fasta_content_type(content_type)?;
    let request = parse_diagnose_body(body)?;
    let outcome = service.diagnose(request)?;

    let mut response = "[TCP][200][Success] diagnostico generado exitosamente".to_string();
    for message in &outcome.operation_messages {
        response.push_str(" | ");
        response.push_str(message);
    }
    Ok(response)
}
