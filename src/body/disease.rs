use crate::bio::fasta;
use crate::BioGuardError;

/// The un-validated fields out of a disease registration frame.
#[derive(Debug, Clone)]
pub struct DiseaseRequest {
    pub name: String,
    pub level_raw: String,
    pub sequence: String,
}

/// Parse a two-line disease frame: `>name|level` then the genetic sequence.
/// The sequence is upper-cased; `name`/`level` are trimmed only.
pub fn parse_disease_body(body: &str) -> Result<DiseaseRequest, BioGuardError> {
    let lines = fasta::lines(body);
    if lines.len() != 2 {
        return Err(BioGuardError::InvalidFormat(format!(
            "disease frame must have exactly 2 lines, got {}",
            lines.len()
        )));
    }

    let fields = fasta::parse_header(lines[0], 2).ok_or_else(|| {
        BioGuardError::InvalidFormat(
            "disease header must start with '>' and have 2 '|'-separated fields".to_string(),
        )
    })?;

    Ok(DiseaseRequest {
        name: fields[0].clone(),
        level_raw: fields[1].clone(),
        sequence: lines[1].to_uppercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_frame() {
        let body = ">ebola|ALTA\ngagtatgtgaatagatatatattagtagtagtaaagtt";
        let req = parse_disease_body(body).unwrap();
        assert_eq!(req.name, "ebola");
        assert_eq!(req.level_raw, "ALTA");
        assert_eq!(req.sequence, "GAGTATGTGAATAGATATATATTAGTAGTAGTAAAGTT");
    }

    #[test]
    fn rejects_single_line() {
        assert!(matches!(
            parse_disease_body(">ebola|ALTA"),
            Err(BioGuardError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_wrong_header_shape() {
        let body = ">ebola\nGATTACA";
        assert!(matches!(
            parse_disease_body(body),
            Err(BioGuardError::InvalidFormat(_))
        ));
    }
}
