//! Google Sheets values API client.
//!
//! Reads a range with `GET /spreadsheets/{id}/values/{range}?key=...`. The API
//! drops trailing blank cells from each row and returns fully blank rows as
//! `[]`, which is exactly the end-of-data marker the parser expects.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use reviewbot_core::config::SheetConfig;

use crate::error::SheetError;
use crate::source::SheetSource;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Fetches the schedule grid from a spreadsheet shared by API key.
#[derive(Debug)]
pub struct GoogleSheetsSource {
    api_base: String,
    sheet_id: String,
    range: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleSheetsSource {
    pub fn new(api_base: String, sheet_id: String, range: String, api_key: String) -> Self {
        Self {
            api_base,
            sheet_id,
            range,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Build from config, failing when the sheet id or API key is missing.
    pub fn from_config(config: &SheetConfig) -> Result<Self, SheetError> {
        let sheet_id = config
            .sheet_id
            .clone()
            .ok_or_else(|| SheetError::Config("SHEET_ID is not set".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| SheetError::Config("GOOGLE_API_KEY is not set".to_string()))?;
        Ok(Self::new(
            config.api_base.clone(),
            sheet_id,
            config.range.clone(),
            api_key,
        ))
    }

    fn values_url(&self) -> Result<reqwest::Url, SheetError> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| SheetError::Config(format!("invalid sheets API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::Config("sheets API base cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(["spreadsheets", self.sheet_id.as_str(), "values", self.range.as_str()]);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

/// Render each cell as the text the sheet shows.
fn decode_rows(body: &str) -> Result<Vec<Vec<String>>, SheetError> {
    let range: ValueRange =
        serde_json::from_str(body).map_err(|e| SheetError::Decode(e.to_string()))?;
    Ok(range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsSource {
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, SheetError> {
        let url = self.values_url()?;
        tracing::debug!(sheet_id = %self.sheet_id, range = %self.range, "fetching schedule sheet");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, sheet_id = %self.sheet_id, "sheets API returned non-2xx status");
            return Err(SheetError::Api {
                status: status.as_u16(),
                body,
            });
        }

        decode_rows(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GoogleSheetsSource {
        GoogleSheetsSource::new(
            "https://sheets.googleapis.com/v4".to_string(),
            "abc123".to_string(),
            "Schedule!A:M".to_string(),
            "key-1".to_string(),
        )
    }

    #[test]
    fn values_url_encodes_range() {
        let url = source().values_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Schedule!A:M?key=key-1"
        );
    }

    #[test]
    fn values_url_escapes_spaces_in_sheet_name() {
        let mut s = source();
        s.range = "Fall 2026!A:M".to_string();
        let url = s.values_url().unwrap();
        assert!(url.as_str().contains("/values/Fall%202026!A:M?"));
    }

    #[test]
    fn decode_keeps_empty_rows() {
        let body = r#"{"range":"Schedule!A1:M5","majorDimension":"ROWS","values":[
            ["Event","Professor"],["Calc II","a@b.edu","10/1",true,45],[],["notes"]]}"#;
        let rows = decode_rows(body).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], vec!["Calc II", "a@b.edu", "10/1", "true", "45"]);
        assert!(rows[2].is_empty());
    }

    #[test]
    fn decode_missing_values_is_empty_grid() {
        let rows = decode_rows(r#"{"range":"Schedule!A1:M1"}"#).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_rows("<html>"), Err(SheetError::Decode(_))));
    }

    #[test]
    fn from_config_requires_sheet_id() {
        let config = SheetConfig {
            api_key: Some("k".to_string()),
            sheet_id: None,
            range: "Sheet1!A:M".to_string(),
            refresh_secs: 300,
            api_base: "https://sheets.googleapis.com/v4".to_string(),
        };
        let err = GoogleSheetsSource::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("SHEET_ID"));
    }
}
