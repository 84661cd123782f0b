//! Title (catalogued book entry) model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A catalogued book entry with its copy counters.
///
/// `available_copies` is derived state: it always equals `total_copies`
/// minus the number of this title's specimens with an active loan. The
/// catalog service is its single writer; nothing else touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub id: i32,
    /// Catalog number (ISBN). Unique across titles.
    pub catalog_no: String,
    pub title: String,
    pub author: String,
    pub page_count: i32,
    pub cover_uri: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}

/// Create title request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitle {
    #[validate(length(min = 1, message = "catalog number must not be empty"))]
    pub catalog_no: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub author: String,
    #[validate(range(min = 1))]
    pub page_count: i32,
    #[validate(url)]
    pub cover_uri: Option<String>,
}

/// Update title request. Descriptive fields only; counters are owned by
/// the inventory side and never client-writable.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTitle {
    pub title: Option<String>,
    pub author: Option<String>,
    #[validate(range(min = 1))]
    pub page_count: Option<i32>,
    #[validate(url)]
    pub cover_uri: Option<String>,
}
