//! Disease registration controller (C11).

use super::require_fasta_content_type;
use crate::body::parse_disease_body;
use crate::service::DiseaseService;

pub fn handle_disease(content_type: &str, body: &str, service: &DiseaseService) -> String {
    match run(content_type, body, service) {
        Ok(response) => response,
        Err(err) => super::error_response(&err),
    }
}

fn run(
    content_type: &str,
    body: &str,
    service: &DiseaseService,
) -> Result<String, crate::BioGuardError> {
    require_fasta_content_type(content_type)?;
    let request = parse_disease_body(body)?;
    service.register(request)?;
    Ok("[TCP][201][Created]".to_string())
}
