use crate::bio::fasta;
use crate::BioGuardError;
use regex::Regex;
use std::sync::OnceLock;

fn date_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

/// The un-validated fields out of a diagnose frame. `date` is only checked
/// for `YYYY-MM-DD` shape here; whether it's a real calendar date is a
/// domain validation concern (spec.md §4.4.3 step 1), not a parsing one.
#[derive(Debug, Clone)]
pub struct DiagnoseRequest {
    pub document: String,
    pub date: String,
    pub sequence: String,
}

/// Parse a two-line diagnose frame: `>document|YYYY-MM-DD` then the sample
/// genetic sequence.
pub fn parse_diagnose_body(body: &str) -> Result<DiagnoseRequest, BioGuardError> {
    let lines = fasta::lines(body);
    if lines.len() != 2 {
        return Err(BioGuardError::InvalidFormat(format!(
            "diagnose frame must have exactly 2 lines, got {}",
            lines.len()
        )));
    }

    let fields = fasta::parse_header(lines[0], 2).ok_or_else(|| {
        BioGuardError::InvalidFormat(
            "diagnose header must start with '>' and have 2 '|'-separated fields".to_string(),
        )
    })?;

    if !date_shape().is_match(&fields[1]) {
        return Err(BioGuardError::InvalidFormat(format!(
            "unparseable date: {}",
            fields[1]
        )));
    }

    Ok(DiagnoseRequest {
        document: fields[0].clone(),
        date: fields[1].clone(),
        sequence: lines[1].to_uppercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_frame() {
        let body = ">12345678|2025-02-19\ngagtatgtgaa";
        let req = parse_diagnose_body(body).unwrap();
        assert_eq!(req.document, "12345678");
        assert_eq!(req.date, "2025-02-19");
        assert_eq!(req.sequence, "GAGTATGTGAA");
    }

    #[test]
    fn rejects_garbage_date_shape() {
        let body = ">12345678|not-a-date\nGAGTATGTGAA";
        assert!(matches!(
            parse_diagnose_body(body),
            Err(BioGuardError::InvalidFormat(_))
        ));
    }

    #[test]
    fn allows_shape_valid_but_calendar_invalid_date_through() {
        // Feb 30 has the right shape; rejecting it is a validation concern,
        // not a parsing one.
        let body = ">12345678|2025-02-30\nGAGTATGTGAA";
        assert!(parse_diagnose_body(body).is_ok());
    }
}
