use crate::bio::fasta;
use crate::BioGuardError;

/// The un-validated fields out of a patient registration frame. Domain
/// ranges (age bounds, gender enum, regex shape) are enforced by the store
/// boundary (spec.md §4.6), not here.
#[derive(Debug, Clone)]
pub struct PatientRequest {
    pub document: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub gender_raw: String,
    pub city: String,
    pub country: String,
}

/// Parse a one-line patient frame:
/// `>document|firstName|lastName|age|email|gender|city|country`.
pub fn parse_patient_body(body: &str) -> Result<PatientRequest, BioGuardError> {
    let lines = fasta::lines(body);
    if lines.len() != 1 {
        return Err(BioGuardError::InvalidFormat(format!(
            "patient frame must have exactly 1 line, got {}",
            lines.len()
        )));
    }

    let fields = fasta::parse_header(lines[0], 8).ok_or_else(|| {
        BioGuardError::InvalidFormat(
            "patient header must start with '>' and have 8 '|'-separated fields".to_string(),
        )
    })?;

    let age: i32 = fields[3]
        .parse()
        .map_err(|_| BioGuardError::InvalidFormat(format!("unparseable age: {}", fields[3])))?;

    Ok(PatientRequest {
        document: fields[0].clone(),
        first_name: fields[1].clone(),
        last_name: fields[2].clone(),
        age,
        email: fields[4].clone(),
        gender_raw: fields[5].clone(),
        city: fields[6].clone(),
        country: fields[7].clone(),
    })
}
