use async_trait::async_trait;
use reqwest::{Method, StatusCode, header};
use serde_json::Value;
use tracing_error::SpanTrace;
use url::Url;

use crate::error::{Error, FaultResponse, Result};
use crate::oauth::{Credential, OauthParameters, Signer};

/// Everything needed to issue one signed API request.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub parameters: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub credential: Credential,
}

/// Sends signed requests and returns the decoded JSON body.
#[async_trait]
pub trait SignedTransport: Send + Sync {
    async fn send(&self, request: SignedRequest) -> Result<Value>;
}

/// [`SignedTransport`] over reqwest, signing every request with OAuth 1.0a.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    consumer_key: String,
    consumer_secret: String,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("consumer_key", &self.consumer_key)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(http: reqwest::Client, parameters: &OauthParameters) -> Self {
        Self {
            http,
            consumer_key: parameters.consumer_key.clone(),
            consumer_secret: parameters.consumer_secret.clone(),
        }
    }

    #[instrument(skip(response))]
    async fn handle_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().await?;

        // Only log brief info about response size at debug level
        debug!("Response from {}: status={}, {} bytes", url, status, text.len());
        trace!("Response text:\n{}", text);

        match status {
            StatusCode::OK => serde_json::from_str::<Value>(&text).map_err(|e| {
                error!(
                    "Deserialization error: {}, near position: {} - response text around that position: {}",
                    e,
                    e.column(),
                    &text
                        .chars()
                        .skip(e.column().saturating_sub(30))
                        .take(100)
                        .collect::<String>()
                );
                Error::deserialization(e, "response", Some(text.clone()))
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("Request to {} was not authorized: {}", url, status);
                Err(Error::Unauthorized {
                    status_code: status,
                    url,
                    response_body: Some(text),
                    span_trace: SpanTrace::capture(),
                })
            }
            status => match serde_json::from_str::<FaultResponse>(&text) {
                Ok(response) => {
                    error!("API fault from {}: {}", url, response);
                    Err(Error::API {
                        response,
                        status_code: status,
                        url,
                        span_trace: SpanTrace::capture(),
                    })
                }
                Err(_) => {
                    error!("Unexpected status code: {}", status);
                    Err(Error::UnexpectedStatus {
                        status_code: status,
                        url,
                        response_body: Some(text),
                        span_trace: SpanTrace::capture(),
                    })
                }
            },
        }
    }
}

#[async_trait]
impl SignedTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: SignedRequest) -> Result<Value> {
        let SignedRequest {
            method,
            url,
            parameters,
            headers,
            credential,
        } = request;

        let signer = Signer::new(&self.consumer_key, &self.consumer_secret).with_token(
            credential.token.as_deref(),
            credential.token_secret.as_deref(),
        );
        let authorization = signer.authorization_header(&method, &url, &parameters, &[])?;

        trace!(?parameters, "making signed request");
        let mut builder = self
            .http
            .request(method, url)
            .query(&parameters)
            .header(header::AUTHORIZATION, authorization);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        Self::handle_response(response).await
    }
}
