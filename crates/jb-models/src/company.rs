//! Companies.

use serde::{Deserialize, Serialize};

/// A company row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub logo_url: Option<String>,
}

/// The embedded company shape selected alongside jobs
/// (`company:companies(name,logo_url)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRef {
    pub name: String,
    pub logo_url: Option<String>,
}
