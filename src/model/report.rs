use crate::model::Disease;

/// A row for the high-infectivity report CSV, produced iff a single
/// diagnosis detects 3 or more `ALTA`-level diseases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighInfectivityRow {
    pub document: String,
    pub total_detected: usize,
    pub alta_count: usize,
    pub non_alta_names: Vec<String>,
    pub alta_names: Vec<String>,
}

impl HighInfectivityRow {
    /// Build a row from a diagnosis's matches, or `None` if the ALTA
    /// threshold (>= 3) isn't met.
    pub fn from_matches(document: &str, matches: &[Disease]) -> Option<Self> {
        let (alta, non_alta): (Vec<_>, Vec<_>) = matches
            .iter()
            .partition(|d| matches!(d.infectiousness, crate::model::Infectiousness::Alta));

        if alta.len() < 3 {
            return None;
        }

        Some(Self {
            document: document.to_string(),
            total_detected: matches.len(),
            alta_count: alta.len(),
            non_alta_names: non_alta.iter().map(|d| d.name.clone()).collect(),
            alta_names: alta.iter().map(|d| d.name.clone()).collect(),
        })
    }
}
