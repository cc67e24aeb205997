//! Executes core `HttpRequest`s with reqwest.

use dti_core::{HttpMethod, HttpRequest, HttpResponse};

use crate::config::ClientConfig;
use crate::error::TransportError;

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str());
        if let Some(url) = &config.proxy {
            let proxy = reqwest::Proxy::all(url).map_err(|source| TransportError::InvalidProxy {
                url: url.clone(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }
        Ok(Self { http: builder.build()? })
    }

    /// One round-trip. Non-2xx statuses come back as data; the core's
    /// parsers decide what they mean.
    pub(crate) async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = ?request.method, url = %request.url, "sending DTI request");

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, bytes = body.len(), url = %request.url, "DTI response");
        Ok(HttpResponse { status, headers, body })
    }
}
