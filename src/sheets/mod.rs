pub mod auth;
pub mod google;
pub mod mapper;

use anyhow::Result;
use async_trait::async_trait;

pub use google::GoogleSheetsStore;
pub use mapper::{plan_updates, write_updates, ColumnMap};

/// Spreadsheet rows in, single cell writes out.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Every row of the first worksheet, header row first. Trailing empty
    /// cells may be missing, so rows can differ in length.
    async fn read_rows(&self) -> Result<Vec<Vec<String>>>;

    /// Write one value. `row` and `column` are 1-based.
    async fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<()>;
}
