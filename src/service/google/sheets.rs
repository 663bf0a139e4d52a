use serde::{Deserialize, Serialize};

use crate::error::google::GoogleError;
use crate::service::google::{api_url, GoogleClient};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct WriteValueRange<'a> {
    range: &'a str,
    values: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_cells: u32,
}

impl GoogleClient {
    /// Reads the cells of `range` as formatted strings, row by row.
    ///
    /// Trailing empty cells are omitted by the API, so rows may be ragged.
    pub async fn sheet_read(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>, GoogleError> {
        let url = api_url(SHEETS_API, &[spreadsheet_id, "values", range])?;
        let response: ValueRange = self.get_json(url).await?;
        Ok(response.values)
    }

    /// Overwrites `range` with `rows`, letting the sheet parse the input.
    ///
    /// # Returns
    /// - `Ok(u32)` - Number of updated cells
    pub async fn sheet_write(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<u32, GoogleError> {
        let mut url = api_url(SHEETS_API, &[spreadsheet_id, "values", range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        let body = WriteValueRange {
            range,
            values: rows,
        };
        let response: UpdateValuesResponse = self.put_json(url, &body).await?;
        Ok(response.updated_cells)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_range_has_no_values() {
        let parsed: ValueRange =
            serde_json::from_str(r#"{"range": "A1:B2", "majorDimension": "ROWS"}"#).unwrap();
        assert!(parsed.values.is_empty());
    }

    #[test]
    fn parses_ragged_rows() {
        let parsed: ValueRange = serde_json::from_str(
            r#"{"range": "A1:C2", "values": [["a", "b", "c"], ["d"]]}"#,
        )
        .unwrap();
        assert_eq!(parsed.values[1], vec!["d".to_string()]);
    }

    #[test]
    fn write_body_shape() {
        let rows = vec![vec!["승인됨".to_string()]];
        let body = serde_json::to_value(WriteValueRange {
            range: "시트!N3",
            values: &rows,
        })
        .unwrap();
        assert_eq!(body["values"][0][0], "승인됨");
        assert_eq!(body["range"], "시트!N3");
    }
}
