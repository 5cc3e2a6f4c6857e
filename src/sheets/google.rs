use std::path::Path;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::auth::{ServiceAccountKey, TokenProvider};
use super::RowStore;

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Row store backed by the first worksheet of a Google spreadsheet.
pub struct GoogleSheetsStore {
    client: reqwest::Client,
    tokens: TokenProvider,
    spreadsheet_id: String,
    worksheet: OnceCell<String>,
}

impl GoogleSheetsStore {
    pub fn new(spreadsheet_id: &str, credentials_path: &Path) -> Result<Self> {
        let key = ServiceAccountKey::from_file(credentials_path)?;
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create Sheets HTTP client")?;
        Ok(Self {
            client,
            tokens: TokenProvider::new(key),
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: OnceCell::new(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(API_BASE)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets API base cannot take path segments"))?
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    /// Title of the first worksheet, looked up once.
    async fn worksheet(&self) -> Result<&str> {
        let title = self
            .worksheet
            .get_or_try_init(|| async {
                let mut url = self.url(&[])?;
                url.query_pairs_mut().append_pair("fields", "sheets.properties.title");
                let meta: SpreadsheetMeta = self.get_json(url).await?;
                let first = meta
                    .sheets
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        anyhow!("Spreadsheet {} has no worksheets", self.spreadsheet_id)
                    })?;
                info!("Using worksheet {:?}", first.properties.title);
                Ok::<_, anyhow::Error>(first.properties.title)
            })
            .await?;
        Ok(title.as_str())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: reqwest::Url) -> Result<T> {
        let token = self.tokens.access_token(&self.client).await?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {url} was rejected"))?;
        response.json().await.context("Malformed Sheets API response")
    }
}

#[async_trait]
impl RowStore for GoogleSheetsStore {
    async fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        let range = quote_sheet(self.worksheet().await?);
        let mut url = self.url(&["values", range.as_str()])?;
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");
        let body: ValueRange = self.get_json(url).await?;
        debug!("Read {} rows from {}", body.values.len(), range);
        Ok(body.values)
    }

    async fn update_cell(&self, row: usize, column: usize, value: &str) -> Result<()> {
        let range = cell_range(self.worksheet().await?, row, column);
        let mut url = self.url(&["values", range.as_str()])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let token = self.tokens.access_token(&self.client).await?;
        self.client
            .put(url)
            .bearer_auth(token)
            .json(&json!({ "range": range, "majorDimension": "ROWS", "values": [[value]] }))
            .send()
            .await
            .with_context(|| format!("Writing {range} failed"))?
            .error_for_status()
            .with_context(|| format!("Writing {range} was rejected"))?;
        debug!("Wrote {} = {:?}", range, value);
        Ok(())
    }
}

/// Spreadsheet column letters for a 1-based column index (1 → A, 27 → AA).
pub fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn quote_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1 reference for one cell, e.g. `'Sheet1'!H5`.
pub fn cell_range(title: &str, row: usize, column: usize) -> String {
    format!("{}!{}{}", quote_sheet(title), column_letters(column), row)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(8), "H");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn ranges_quote_titles() {
        assert_eq!(cell_range("Sheet1", 5, 8), "'Sheet1'!H5");
        assert_eq!(cell_range("Bob's leads", 2, 23), "'Bob''s leads'!W2");
    }

    #[test]
    fn empty_value_range_has_no_rows() {
        let body: ValueRange = serde_json::from_str(r#"{"range":"'Sheet1'!A1:Z1000"}"#).unwrap();
        assert!(body.values.is_empty());
    }

    #[test]
    fn metadata_first_sheet() {
        let meta: SpreadsheetMeta = serde_json::from_str(
            r#"{"sheets":[{"properties":{"title":"Leads"}},{"properties":{"title":"Old"}}]}"#,
        )
        .unwrap();
        assert_eq!(meta.sheets[0].properties.title, "Leads");
    }
}
