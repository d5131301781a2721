//! Low-level FASTA text utilities shared by the body parsers (`body`) and
//! the file-backed stores (`store`). Kept deliberately simple: BioGuard's
//! FASTA dialects are one or two lines, not multi-record files.

/// Split `text` on any line terminator, trim each line, and drop empty ones.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Parse a FASTA header line: require a leading `>`, split the remainder on
/// `|`, and return the trimmed fields. Fails if the field count doesn't
/// match `shape`.
pub fn parse_header(first_line: &str, shape: usize) -> Option<Vec<String>> {
    let rest = first_line.strip_prefix('>')?;
    let fields: Vec<String> = rest.split('|').map(|f| f.trim().to_string()).collect();
    if fields.len() == shape {
        Some(fields)
    } else {
        None
    }
}

/// The second line of `fasta_text`, upper-cased, or the empty string if the
/// text is malformed (fewer than two lines).
pub fn sequence_of(fasta_text: &str) -> String {
    lines(fasta_text)
        .get(1)
        .map(|s| s.to_uppercase())
        .unwrap_or_default()
}
