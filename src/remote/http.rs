use crate::models::{EntityKind, Payload, RemoteId};
use crate::remote::{RemoteError, RemoteRecord, RemoteService};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// reqwest based client for `POST /{resource}/` and `GET /{resource}/?limit=N`.
#[derive(Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRemoteClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transient(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, kind: EntityKind) -> String {
        format!("{}/{}/", self.base_url, kind.resource())
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }
}

fn transport_err(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Transient(format!("request timed out: {e}"))
    } else {
        RemoteError::Transient(format!("network error: {e}"))
    }
}

/// Turn non-2xx responses into the matching error class.
async fn check_status(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = extract_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    if status.is_client_error()
        && status != StatusCode::REQUEST_TIMEOUT
        && status != StatusCode::TOO_MANY_REQUESTS
    {
        Err(RemoteError::Rejected {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(RemoteError::Transient(format!(
            "HTTP {}: {}",
            status.as_u16(),
            message
        )))
    }
}

/// The service reports errors as `{"detail": "..."}` or `{"detail": [..]}`.
fn extract_detail(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl RemoteService for HttpRemoteClient {
    async fn create(&self, kind: EntityKind, payload: &Payload) -> Result<RemoteId, RemoteError> {
        let body = payload
            .to_request_body()
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        debug!(%kind, url = %self.url(kind), "POST create");

        let resp = self
            .authorize(self.client.post(self.url(kind)).json(&body))
            .send()
            .await
            .map_err(transport_err)?;
        let resp = check_status(resp).await?;

        let created: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        Ok(RemoteRecord::from_json(created)?.id)
    }

    async fn fetch_recent(
        &self,
        kind: EntityKind,
        limit: usize,
    ) -> Result<Vec<RemoteRecord>, RemoteError> {
        debug!(%kind, limit, "GET recent");

        let resp = self
            .authorize(
                self.client
                    .get(self.url(kind))
                    .query(&[("limit", limit.to_string())]),
            )
            .send()
            .await
            .map_err(transport_err)?;
        let resp = check_status(resp).await?;

        let list: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        let Value::Array(items) = list else {
            return Err(RemoteError::Malformed("expected a JSON array".into()));
        };

        items.into_iter().map(RemoteRecord::from_json).collect()
    }
}
