//! Typed repository for company rows.

use jb_models::Company;

use crate::client::{AccessToken, PostgrestClient};
use crate::error::PostgrestResult;
use crate::query::Query;

const TABLE: &str = "companies";

/// Repository for company rows. Companies are reference data for the
/// filter dropdown and job cards.
pub struct CompaniesRepo {
    client: PostgrestClient,
}

impl CompaniesRepo {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// List every company.
    pub async fn list(&self, token: &AccessToken) -> PostgrestResult<Vec<Company>> {
        let query = Query::new().select("*");
        self.client.select_rows(token, TABLE, &query).await
    }
}
