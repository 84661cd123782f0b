//! Data models for the Alexandria lending engine

pub mod fine;
pub mod loan;
pub mod patron;
pub mod specimen;
pub mod title;

// Re-export commonly used types
pub use fine::{Fine, FineRecord};
pub use loan::{IssueLoan, Loan, LoanRecord};
pub use patron::{Patron, PatronCategory, PatronKind, PatronStatus};
pub use specimen::Specimen;
pub use title::Title;
