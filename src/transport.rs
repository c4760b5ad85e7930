use crate::error::{CollectorError, Result};
use crate::utils::constants::USER_AGENT;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Status and body of a completed GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking GET transport shared by the collectors' worker threads
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Fetch `url`, treating any status other than 200 as a connection failure
    fn check_url(&self, url: &str) -> Result<HttpResponse> {
        let response = self.get(url)?;
        if response.is_ok() {
            Ok(response)
        } else {
            Err(CollectorError::Connection {
                url: url.to_string(),
                status: response.status,
            })
        }
    }
}

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        debug!("{} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}
