pub mod diagnostic;
pub mod disease;
pub mod mutation;
pub mod patient;
pub mod report;

pub use diagnostic::Diagnostic;
pub use disease::{Disease, Infectiousness};
pub use mutation::{change_segments, ChangeKind, MutationRow};
pub use patient::{Gender, Patient};
pub use report::HighInfectivityRow;
