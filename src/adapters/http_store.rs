use crate::domain::model::{BillRecord, FileSelection, StoredFile};
use crate::domain::ports::{BillStore, ConfigProvider};
use crate::utils::error::{BillError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

/// Bill store backed by the bills REST API.
#[derive(Debug, Clone)]
pub struct HttpBillStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpBillStore {
    pub fn new(api_endpoint: &str, timeout: Duration) -> Result<Self> {
        crate::utils::validation::validate_api_endpoint("api_endpoint", api_endpoint)?;

        // Without a trailing slash `join` would drop the last path segment.
        let mut base = api_endpoint.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            token: None,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.api_endpoint(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    /// Bearer token sent with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn bills_url(&self) -> Result<Url> {
        Ok(self.base_url.join("bills")?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(BillError::store(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn upload(&self, file: &FileSelection, email: &str) -> Result<StoredFile> {
        let url = self.bills_url()?;
        tracing::debug!("Uploading '{}' to {}", file.base_name(), url);

        let part = Part::bytes(file.data.clone())
            .file_name(file.base_name().to_string())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("file", part).text("email", email.to_string());

        let response = self.send(self.client.post(url).multipart(form)).await?;
        Ok(response.json::<StoredFile>().await?)
    }

    async fn create(&self, bill: &BillRecord) -> Result<StoredFile> {
        let url = self.bills_url()?;
        tracing::debug!("Creating bill '{}' at {}", bill.name, url);

        let response = self.send(self.client.post(url).json(bill)).await?;
        Ok(response.json::<StoredFile>().await?)
    }

    async fn list(&self) -> Result<Vec<BillRecord>> {
        let url = self.bills_url()?;
        tracing::debug!("Listing bills from {}", url);

        let response = self.send(self.client.get(url)).await?;
        let rows = response.json::<Vec<serde_json::Value>>().await?;
        Ok(decode_bills(rows))
    }
}

/// A row the listing cannot read (unknown category, malformed amount) is
/// logged and left out; the other bills are still listed.
fn decode_bills(rows: Vec<serde_json::Value>) -> Vec<BillRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<BillRecord>(row) {
            Ok(bill) => Some(bill),
            Err(e) => {
                tracing::warn!("Skipping unreadable bill at index {}: {}", index, e);
                None
            }
        })
        .collect()
}
