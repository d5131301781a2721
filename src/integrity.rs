//! Content-addressed integrity: hex-encoded SHA-256 digests, and the
//! filename<->content binding every disease and sample file is stored under.

use crate::BioGuardError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// SHA-256 over the UTF-8 bytes of `text`, lowercase hex, 64 characters.
pub fn hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Read `path` as UTF-8 and verify that `hash(content)` equals the filename
/// with `extension` stripped. A missing, empty, unreadable, or mismatched
/// file is treated as corrupt; callers treat a corrupt file as absent.
pub fn verify_file(path: &Path, extension: &str) -> Result<(), BioGuardError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BioGuardError::CorruptedData(format!("cannot read {}: {e}", path.display()))
    })?;

    if content.is_empty() {
        return Err(BioGuardError::CorruptedData(format!(
            "{} is empty",
            path.display()
        )));
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BioGuardError::CorruptedData(format!("bad file name: {}", path.display())))?;

    let expected_name = file_name
        .strip_suffix(extension)
        .ok_or_else(|| BioGuardError::CorruptedData(format!("bad extension: {file_name}")))?;

    let actual_hash = hash(&content);
    if actual_hash != expected_name {
        return Err(BioGuardError::CorruptedData(format!(
            "hash mismatch for {}: expected {}, got {}",
            path.display(),
            expected_name,
            actual_hash
        )));
    }

    Ok(())
}
