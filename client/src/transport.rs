//! reqwest-backed [`Transport`].

use crate::config::ClientConfig;
use crate::error::ConfigError;
use eventhub_core::{HttpRequest, HttpResponse, Transport, TransportError};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};

/// Sends request descriptors to the EventHub backend over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for `config.base_url` with `config.request_timeout`
    /// applied to every request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a transport around an existing reqwest client.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn map_error(error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, self.url(&request.path))
            .headers(request.headers)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| map_error(&e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| map_error(&e))?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_against_base() {
        let transport = ReqwestTransport::with_client(Client::new(), "https://api.example.com/api/");
        assert_eq!(transport.base_url(), "https://api.example.com/api");
        assert_eq!(
            transport.url("/v1/eventos/"),
            "https://api.example.com/api/v1/eventos/"
        );
        assert_eq!(
            transport.url("token/"),
            "https://api.example.com/api/token/"
        );
        assert_eq!(
            transport.url("https://other.example.com/x/"),
            "https://other.example.com/x/"
        );
    }
}
