//! HTTP sheet-bridge store implementation.
//!
//! Talks to a spreadsheet bridge service exposing worksheets as JSON row
//! collections:
//!
//! - `GET  {base}/v1/spreadsheets/{id}/worksheets/{name}/rows` -> `{"rows": [...]}`
//! - `PUT  {base}/v1/spreadsheets/{id}/worksheets/{name}/rows` with `{"rows": [...]}`
//!   replacing the worksheet contents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use prepost_core::error::StoreError;
use prepost_core::model::ExamRecord;
use prepost_core::traits::TabularStore;

const DEFAULT_BASE_URL: &str = "https://sheets-bridge.prepost.dev";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Store backend backed by the HTTP sheet bridge.
pub struct SheetsStore {
    api_key: String,
    base_url: String,
    spreadsheet_id: String,
    client: reqwest::Client,
}

impl SheetsStore {
    pub fn new(api_key: &str, spreadsheet_id: &str, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            spreadsheet_id: spreadsheet_id.to_string(),
            client,
        }
    }

    fn rows_url(&self, worksheet: &str) -> String {
        format!(
            "{}/v1/spreadsheets/{}/worksheets/{}/rows",
            self.base_url, self.spreadsheet_id, worksheet
        )
    }

    fn map_send_error(e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(DEFAULT_TIMEOUT_SECS)
        } else {
            StoreError::Network(e.to_string())
        }
    }

    async fn check_status(
        response: reqwest::Response,
        worksheet: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(StoreError::WorksheetNotFound(worksheet.to_string()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BridgeError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StoreError::Api { status, message });
        }
        Ok(response)
    }
}

#[derive(Serialize, Deserialize)]
struct RowsEnvelope {
    #[serde(default)]
    rows: Vec<ExamRecord>,
}

#[derive(Deserialize)]
struct BridgeError {
    error: BridgeErrorBody,
}

#[derive(Deserialize)]
struct BridgeErrorBody {
    message: String,
}

#[async_trait]
impl TabularStore for SheetsStore {
    fn name(&self) -> &str {
        "sheets"
    }

    #[instrument(skip(self), fields(worksheet = %worksheet))]
    async fn read_rows(&self, worksheet: &str) -> Result<Vec<ExamRecord>, StoreError> {
        let response = self
            .client
            .get(self.rows_url(worksheet))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let response = Self::check_status(response, worksheet).await?;

        let envelope: RowsEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(format!("failed to parse rows: {e}")))?;

        Ok(envelope.rows)
    }

    #[instrument(skip(self, rows), fields(worksheet = %worksheet, rows = rows.len()))]
    async fn overwrite(&self, worksheet: &str, rows: &[ExamRecord]) -> Result<(), StoreError> {
        let body = RowsEnvelope {
            rows: rows.to_vec(),
        };

        let response = self
            .client
            .put(self.rows_url(worksheet))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Self::check_status(response, worksheet).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ROWS_PATH: &str = "/v1/spreadsheets/sheet-1/worksheets/Data/rows";

    fn store(server: &MockServer) -> SheetsStore {
        SheetsStore::new("test-key", "sheet-1", Some(server.uri()))
    }

    #[tokio::test]
    async fn read_rows_success() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "rows": [
                {"Nama": "Budi", "Skor_Pretest": 70, "Skor_Posttest": 90,
                 "Waktu": "2025-01-01 10:00:00"}
            ]
        });

        Mock::given(method("GET"))
            .and(path(ROWS_PATH))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let rows = store(&server).read_rows("Data").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Budi");
        assert_eq!(rows[0].pretest_score, 70);
        assert_eq!(rows[0].posttest_score, 90);
    }

    #[tokio::test]
    async fn read_empty_worksheet() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ROWS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"rows": []})),
            )
            .mount(&server)
            .await;

        let rows = store(&server).read_rows("Data").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn overwrite_sends_rows_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(ROWS_PATH))
            .and(body_partial_json(serde_json::json!({
                "rows": [{"Nama": "Budi", "Skor_Pretest": 70}]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let rows = vec![ExamRecord::new_pretest(
            "Budi",
            70,
            "2025-01-01 10:00:00".into(),
        )];
        store(&server).overwrite("Data", &rows).await.unwrap();
    }

    #[tokio::test]
    async fn authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ROWS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = store(&server).read_rows("Data").await.unwrap_err();
        assert!(matches!(err, StoreError::AuthenticationFailed(_)));
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn missing_worksheet() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ROWS_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = store(&server).read_rows("Data").await.unwrap_err();
        assert!(matches!(err, StoreError::WorksheetNotFound(_)));
    }

    #[tokio::test]
    async fn server_error_with_message() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(ROWS_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": {"message": "quota exceeded"}
            })))
            .mount(&server)
            .await;

        let err = store(&server).overwrite("Data", &[]).await.unwrap_err();
        match err {
            StoreError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ROWS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = store(&server).read_rows("Data").await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
