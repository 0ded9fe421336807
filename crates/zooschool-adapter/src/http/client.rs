/*
[INPUT]:  HTTP configuration (base URL, timeouts, service key)
[OUTPUT]: Configured reqwest client ready for backend table calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::http::{CarpoolError, Result};
use crate::types::PostgrestError;

/// Path prefix of the backend's table API
const REST_PREFIX: &str = "/rest/v1/";

/// Accept header asking for a single JSON object instead of an array
pub(crate) const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Prefer header asking for the written row(s) back
pub(crate) const RETURN_REPRESENTATION: &str = "return=representation";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the carpool backend
#[derive(Debug, Clone)]
pub struct CarpoolClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl CarpoolClient {
    /// Create a new client with default configuration
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url, api_key)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(CarpoolError::Config("backend api key is empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            api_key: api_key.trim().to_string(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build full URL for a table with `column=eq.value` style filters
    pub(crate) fn table_url(&self, table: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(&format!("{REST_PREFIX}{table}"))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Build request builder for a table, carrying the service key headers
    pub(crate) fn table_request(
        &self,
        method: Method,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<RequestBuilder> {
        let url = self.table_url(table, query)?;
        debug!(%method, %url, "backend request");
        Ok(self
            .http_client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key)))
    }

    /// Send a request and decode the JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|err| self.transport_error(err))?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(CarpoolError::from)
    }

    /// Send a request whose response body is irrelevant
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await.map_err(|err| self.transport_error(err))?;
        check_status(response).await?;
        Ok(())
    }

    fn transport_error(&self, err: reqwest::Error) -> CarpoolError {
        if err.is_timeout() {
            CarpoolError::Timeout {
                duration: self.timeout.as_secs(),
            }
        } else {
            CarpoolError::Http(err)
        }
    }
}

/// `eq.` filter value for a column
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{value}")
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status, &body, retry_after))
}

pub(crate) fn error_from_body(status: StatusCode, body: &str, retry_after: Option<u64>) -> CarpoolError {
    let parsed: Option<PostgrestError> = serde_json::from_str(body).ok();

    if let Some(err) = parsed.as_ref().filter(|err| err.is_no_rows()) {
        let resource = err.details.clone().unwrap_or_else(|| "row".to_string());
        return CarpoolError::not_found(resource);
    }

    let message = parsed
        .map(|err| err.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => CarpoolError::RateLimit {
            retry_after: retry_after.unwrap_or(1),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CarpoolError::Authentication { message }
        }
        _ => CarpoolError::api_error(status, message),
    }
}
