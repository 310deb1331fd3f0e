use std::fmt;

use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{EngineError, ResultEngine, codec::Grid};

use super::{SheetStore, ValueInput};

pub const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

/// Google Sheets (REST v4) backend.
///
/// Authentication is a ready-made OAuth bearer token; obtaining and
/// refreshing it is left to whoever writes the configuration.
#[derive(Clone)]
pub struct SheetsStore {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    access_token: String,
}

impl fmt::Debug for SheetsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsStore")
            .field("base_url", &self.base_url.as_str())
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

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
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl SheetsStore {
    pub fn new(base_url: &str, spreadsheet_id: &str, access_token: &str) -> ResultEngine<Self> {
        let spreadsheet_id = spreadsheet_id.trim();
        if spreadsheet_id.is_empty() {
            return Err(EngineError::Storage("missing spreadsheet id".to_string()));
        }
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(EngineError::Unauthorized("missing access token".to_string()));
        }
        let base_url = Url::parse(base_url)
            .map_err(|err| EngineError::Storage(format!("invalid sheets url: {err}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ResultEngine<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EngineError::Storage("sheets url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn sheet_properties(&self) -> ResultEngine<Vec<SheetProperties>> {
        let endpoint = self.endpoint(&[&self.spreadsheet_id])?;
        let res = self
            .http
            .get(endpoint)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties(sheetId,title)")])
            .send()
            .await?;
        let meta: SpreadsheetMeta = check(res, None).await?.json().await?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|entry| entry.properties)
            .collect())
    }

    async fn batch_update(&self, request: Value, title: Option<&str>) -> ResultEngine<()> {
        let batch = format!("{}:batchUpdate", self.spreadsheet_id);
        let endpoint = self.endpoint(&[&batch])?;
        let res = self
            .http
            .post(endpoint)
            .bearer_auth(&self.access_token)
            .json(&json!({ "requests": [request] }))
            .send()
            .await?;
        check(res, title).await?;
        Ok(())
    }
}

impl SheetStore for SheetsStore {
    async fn tab_titles(&self) -> ResultEngine<Vec<String>> {
        Ok(self
            .sheet_properties()
            .await?
            .into_iter()
            .map(|props| props.title)
            .collect())
    }

    async fn add_tab(&self, title: &str) -> ResultEngine<()> {
        tracing::debug!(title, "adding sheet");
        let request = json!({
            "addSheet": {
                "properties": {
                    "title": title,
                    "gridProperties": { "rowCount": 1, "columnCount": 6 }
                }
            }
        });
        self.batch_update(request, None).await
    }

    async fn delete_tab(&self, title: &str) -> ResultEngine<()> {
        let sheet_id = self
            .sheet_properties()
            .await?
            .into_iter()
            .find(|props| props.title == title)
            .map(|props| props.sheet_id)
            .ok_or_else(|| EngineError::ListNotFound(title.to_string()))?;
        tracing::debug!(title, sheet_id, "deleting sheet");
        self.batch_update(json!({ "deleteSheet": { "sheetId": sheet_id } }), Some(title))
            .await
    }

    async fn read_tab(&self, title: &str) -> ResultEngine<Grid> {
        let range = quoted_range(title);
        let endpoint = self.endpoint(&[&self.spreadsheet_id, "values", &range])?;
        let res = self
            .http
            .get(endpoint)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let body: ValueRange = check(res, Some(title)).await?.json().await?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn write_tab(&self, title: &str, grid: &Grid, input: ValueInput) -> ResultEngine<()> {
        let range = quoted_range(title);

        let clear = format!("{range}:clear");
        let endpoint = self.endpoint(&[&self.spreadsheet_id, "values", &clear])?;
        let res = self
            .http
            .post(endpoint)
            .bearer_auth(&self.access_token)
            .json(&json!({}))
            .send()
            .await?;
        check(res, Some(title)).await?;

        let anchor = format!("{range}!A1");
        let endpoint = self.endpoint(&[&self.spreadsheet_id, "values", &anchor])?;
        let res = self
            .http
            .put(endpoint)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", input.as_str())])
            .json(&json!({
                "range": anchor,
                "majorDimension": "ROWS",
                "values": grid,
            }))
            .send()
            .await?;
        check(res, Some(title)).await?;
        Ok(())
    }
}

/// A1 notation for a whole tab: `'It''s mine'`.
fn quoted_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

/// Maps non-success statuses to engine errors. `title` is the tab the request
/// targeted; Sheets answers 400 "Unable to parse range" for a missing tab.
async fn check(res: Response, title: Option<&str>) -> ResultEngine<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = res
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error.message)
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(classify(status, title, message))
}

/// Only a range that fails to parse means the tab is gone; any other 400
/// (a rejected values payload, for one) is a storage failure.
fn classify(status: StatusCode, title: Option<&str>, message: String) -> EngineError {
    match (status, title) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => EngineError::Unauthorized(message),
        (StatusCode::NOT_FOUND, Some(title)) => EngineError::ListNotFound(title.to_string()),
        (StatusCode::BAD_REQUEST, Some(title)) if message.contains("Unable to parse range") => {
            EngineError::ListNotFound(title.to_string())
        }
        _ => EngineError::Storage(format!("{status}: {message}")),
    }
}
