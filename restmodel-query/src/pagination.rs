use restmodel_types::Dao;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size of [`Query::first_page`](crate::Query::first_page).
pub const DEFAULT_PAGINATE_PER_PAGE: u32 = 30;

/// Page selection merged into GET criteria as `page` / `perPage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// The pagination as payload fields, in local casing.
    pub fn to_dao(&self) -> Dao {
        let mut dao = Dao::new();
        dao.insert("page".to_string(), Value::from(self.page));
        dao.insert("perPage".to_string(), Value::from(self.per_page));
        dao
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 15)
    }
}
