pub mod diagnose;
pub mod disease;
pub mod patient;

pub use diagnose::handle_diagnose;
pub use disease::handle_disease;
pub use patient::handle_patient;

use crate::body::FASTA_CONTENT_TYPE;
use crate::BioGuardError;

/// Build the `[TCP][<code>][<category>] <message>` response for an error,
/// substituting the client-safe message (spec.md §4.5/§4.7).
pub fn error_response(err: &BioGuardError) -> String {
    format!(
        "[TCP][{}][{}] {}",
        err.status_code(),
        err.category(),
        err.to_client_message()
    )
}

/// Shared content-type gate: every controller requires `application/fasta`.
pub fn require_fasta_content_type(content_type: &str) -> Result<(), BioGuardError> {
    if content_type != FASTA_CONTENT_TYPE {
        return Err(BioGuardError::InvalidFormat(format!(
            "unsupported content-type: {content_type}"
        )));
    }
    Ok(())
}
