// HTTP client for the report query service

use common::models::{CurrentTime, ExecutionDate, ReportFilter, ReportRow};
use futures::future::{AbortRegistration, Abortable};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::errors::ClientError;

/// Client of the three read endpoints. Requests are never retried.
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: Client,
    base_url: Url,
}

impl ReportClient {
    /// `base_url` is the service root, e.g. `http://localhost:8080`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Network(e.to_string()))?;
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Network(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Current time of the report database; doubles as a connectivity check
    #[instrument(skip(self))]
    pub async fn current_time(&self) -> Result<Vec<CurrentTime>, ClientError> {
        let url = self.endpoint(&["api", "reports"])?;
        self.get_json(self.http.get(url)).await
    }

    /// Executions matching the filter, most recent first
    #[instrument(skip(self))]
    pub async fn fetch_dates(&self, filter: &ReportFilter) -> Result<Vec<ExecutionDate>, ClientError> {
        let url = self.endpoint(&["api", "report-dates"])?;
        let request = self.http.get(url).query(&[
            ("entidad", filter.entidad.as_str()),
            ("reporte", filter.reporte.as_str()),
            ("ambiente", filter.ambiente.as_str()),
        ]);

        let dates: Vec<ExecutionDate> = self.get_json(request).await?;
        tracing::debug!(count = dates.len(), "Execution dates received");
        Ok(dates)
    }

    /// Rows of one execution; resolves to `ClientError::Canceled` once the
    /// matching `AbortHandle` is triggered
    #[instrument(skip(self, registration))]
    pub async fn fetch_rows(
        &self,
        execution_id: &str,
        registration: AbortRegistration,
    ) -> Result<Vec<ReportRow>, ClientError> {
        let url = self.endpoint(&["api", "report-data", execution_id])?;
        let request = self.http.get(url);

        let rows: Vec<ReportRow> = Abortable::new(self.get_json(request), registration)
            .await
            .map_err(|_| ClientError::Canceled)??;

        tracing::debug!(row_count = rows.len(), "Report rows received");
        Ok(rows)
    }
}
