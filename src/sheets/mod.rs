// src/sheets/mod.rs

use anyhow::Context;
use serde::Deserialize;

use crate::models::SheetTable;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// Response shape of GET .../values/{range}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: String, api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("reqwest build error")?;
        Ok(Self {
            http,
            spreadsheet_id,
            api_key,
        })
    }

    /// Fetch one range as a table. The first line of the range is the header;
    /// a range that comes back without one is the empty table.
    pub async fn fetch_table(&self, range: &str) -> anyhow::Result<SheetTable> {
        let mut url = reqwest::Url::parse(SHEETS_API_BASE).context("bad API base url")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("bad API base url"))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range); // percent-encodes the quoted tab name

        let resp: ValueRange = self
            .http
            .get(url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "FORMATTED_VALUE"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(into_table(resp.values))
    }

    /// Degraded read for the dashboard path: an auth or network failure
    /// renders downstream as "data unavailable", never as a 500.
    pub async fn table_or_empty(&self, range: &str) -> SheetTable {
        match self.fetch_table(range).await {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(range, error = %err, "sheet fetch failed, serving empty table");
                SheetTable::empty()
            }
        }
    }
}

// The API returns untyped JSON cells; everything downstream works on the
// formatted text.
fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn into_table(values: Vec<Vec<serde_json::Value>>) -> SheetTable {
    let mut lines = values.into_iter();
    let Some(header) = lines.next() else {
        return SheetTable::empty();
    };
    SheetTable {
        headers: header.iter().map(cell_text).collect(),
        rows: lines
            .map(|line| line.iter().map(cell_text).collect())
            .collect(),
    }
}
