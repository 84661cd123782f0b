//! Patron model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Patron category kind, used to key the lending policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatronKind {
    Student,
    Teacher,
}

impl std::fmt::Display for PatronKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatronKind::Student => write!(f, "student"),
            PatronKind::Teacher => write!(f, "teacher"),
        }
    }
}

/// Patron category, fixed at registration.
///
/// Category-specific policy (loan limit, loan duration) is resolved by a
/// lookup on [`PatronKind`], not carried here; the payload holds the
/// category-specific directory fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PatronCategory {
    Student { guardian_phone: String },
    Teacher { department: String },
}

impl PatronCategory {
    pub fn kind(&self) -> PatronKind {
        match self {
            PatronCategory::Student { .. } => PatronKind::Student,
            PatronCategory::Teacher { .. } => PatronKind::Teacher,
        }
    }
}

/// Patron circulation status.
///
/// `Delinquent` is reserved: the declared model carries it but no rule
/// transitions into or out of it. Accrual moves Active -> Fined and
/// resolution moves Fined -> Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatronStatus {
    Active,
    Delinquent,
    Fined,
}

impl std::fmt::Display for PatronStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatronStatus::Active => write!(f, "active"),
            PatronStatus::Delinquent => write!(f, "delinquent"),
            PatronStatus::Fined => write!(f, "fined"),
        }
    }
}

/// A library user from the patron directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patron {
    pub id: i32,
    /// Unique account login.
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique contact email.
    pub email: String,
    pub street: String,
    pub number: String,
    pub floor: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub category: PatronCategory,
    pub status: PatronStatus,
}

/// Register patron request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePatron {
    #[validate(length(min = 1, message = "login must not be empty"))]
    pub login: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub street: String,
    pub number: String,
    pub floor: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub category: PatronCategory,
}

/// Update patron request. The category kind and the circulation status
/// are not client-mutable; status only moves through the fine lifecycle.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePatron {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub floor: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Category-specific field updates: guardian phone for students,
    /// department for teachers. Ignored when the kind does not match.
    pub guardian_phone: Option<String>,
    pub department: Option<String>,
}
