use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Method;

use crate::adapters::purge::{PurgeClient, PurgeResponse};

const PURGE_METHOD: &[u8] = b"PURGE";

/// Sends `PURGE` requests straight to the public URL of an object.
#[derive(Debug, Clone)]
pub struct HttpPurgeClient {
    http: reqwest::Client,
    method: Method,
}

impl HttpPurgeClient {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| format!("failed to build purge http client: {error}"))?;
        Self::with_client(http)
    }

    pub fn with_client(http: reqwest::Client) -> Result<Self, String> {
        let method = Method::from_bytes(PURGE_METHOD)
            .map_err(|error| format!("invalid purge method: {error}"))?;
        Ok(Self { http, method })
    }
}

#[async_trait]
impl PurgeClient for HttpPurgeClient {
    async fn send_purge(&self, url: &str) -> Result<PurgeResponse, String> {
        let response = self
            .http
            .request(self.method.clone(), url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|error| format!("failed to send purge request: {error}"))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| format!("failed to read purge response body: {error}"))?;

        Ok(PurgeResponse {
            status,
            body: body.to_vec(),
        })
    }
}
