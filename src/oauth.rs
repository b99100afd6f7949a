//! OAuth 1.0a configuration, request signing and the three-legged handshake.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, header};
use sha1::Sha1;
use url::Url;
use uuid::Uuid;

use crate::callback::{AuthorizeUrlHandler, CallbackReceiver};
use crate::error::{Error, Result};

pub const INTUIT_REQUEST_TOKEN_URL: &str = "https://oauth.intuit.com/oauth/v1/get_request_token";
pub const INTUIT_AUTHORIZE_URL: &str = "https://appcenter.intuit.com/Connect/Begin";
pub const INTUIT_ACCESS_TOKEN_URL: &str = "https://oauth.intuit.com/oauth/v1/get_access_token";

pub const OAUTH_TOKEN: &str = "oauth_token";
pub const OAUTH_TOKEN_SECRET: &str = "oauth_token_secret";
const OAUTH_VERIFIER: &str = "oauth_verifier";
const OAUTH_CALLBACK: &str = "oauth_callback";
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

// RFC 3986 unreserved characters stay as they are
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Consumer credentials and OAuth endpoints of the application.
#[derive(Clone)]
pub struct OauthParameters {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
    pub callback_url: Option<String>,
}

impl OauthParameters {
    #[must_use]
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        request_token_url: String,
        authorize_url: String,
        access_token_url: String,
        callback_url: Option<String>,
    ) -> Self {
        Self {
            consumer_key,
            consumer_secret,
            request_token_url,
            authorize_url,
            access_token_url,
            callback_url,
        }
    }

    /// Parameters pointing at Intuit's OAuth 1.0a endpoints.
    #[must_use]
    pub fn intuit(consumer_key: String, consumer_secret: String, callback_url: Option<String>) -> Self {
        Self::new(
            consumer_key,
            consumer_secret,
            INTUIT_REQUEST_TOKEN_URL.to_string(),
            INTUIT_AUTHORIZE_URL.to_string(),
            INTUIT_ACCESS_TOKEN_URL.to_string(),
            callback_url,
        )
    }

    /// Creates Intuit parameters from `QUICKBOOKS_CONSUMER_KEY`, `QUICKBOOKS_CONSUMER_SECRET`
    /// and the optional `QUICKBOOKS_CALLBACK_URL` environment variables.
    pub fn from_env() -> Result<Self> {
        let var = |variable: &str| {
            std::env::var(variable).map_err(|_| Error::MissingConfiguration {
                variable: variable.to_string(),
            })
        };
        Ok(Self::intuit(
            var("QUICKBOOKS_CONSUMER_KEY")?,
            var("QUICKBOOKS_CONSUMER_SECRET")?,
            std::env::var("QUICKBOOKS_CALLBACK_URL").ok(),
        ))
    }
}

impl fmt::Debug for OauthParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OauthParameters")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("request_token_url", &self.request_token_url)
            .field("authorize_url", &self.authorize_url)
            .field("access_token_url", &self.access_token_url)
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// The user token a request is signed with.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub token: Option<String>,
    pub token_secret: Option<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Produces OAuth 1.0a `HMAC-SHA1` authorization headers.
#[derive(Clone, Copy)]
pub struct Signer<'a> {
    consumer_key: &'a str,
    consumer_secret: &'a str,
    token: Option<&'a str>,
    token_secret: Option<&'a str>,
}

impl<'a> Signer<'a> {
    #[must_use]
    pub fn new(consumer_key: &'a str, consumer_secret: &'a str) -> Self {
        Self {
            consumer_key,
            consumer_secret,
            token: None,
            token_secret: None,
        }
    }

    #[must_use]
    pub fn with_token(self, token: Option<&'a str>, token_secret: Option<&'a str>) -> Self {
        Self {
            token,
            token_secret,
            ..self
        }
    }

    /// Builds the `Authorization` header for a request. `parameters` are the query or
    /// form parameters sent with the request; `extra` are additional protocol
    /// parameters such as `oauth_callback` or `oauth_verifier`.
    pub fn authorization_header(
        &self,
        method: &Method,
        url: &Url,
        parameters: &[(String, String)],
        extra: &[(&str, &str)],
    ) -> Result<String> {
        let nonce = Uuid::new_v4().simple().to_string();
        let timestamp = time::OffsetDateTime::now_utc().unix_timestamp().to_string();
        self.authorization_header_with(method, url, parameters, extra, &nonce, &timestamp)
    }

    fn authorization_header_with(
        &self,
        method: &Method,
        url: &Url,
        parameters: &[(String, String)],
        extra: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth_parameters = vec![
            ("oauth_consumer_key", self.consumer_key),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
            ("oauth_version", OAUTH_VERSION),
        ];
        if let Some(token) = self.token {
            oauth_parameters.push((OAUTH_TOKEN, token));
        }
        oauth_parameters.extend_from_slice(extra);

        let signature = self.signature(method, url, parameters, &oauth_parameters)?;
        oauth_parameters.push(("oauth_signature", signature.as_str()));
        oauth_parameters.sort_unstable();

        let header_params = oauth_parameters
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {header_params}"))
    }

    fn signature(
        &self,
        method: &Method,
        url: &Url,
        parameters: &[(String, String)],
        oauth_parameters: &[(&str, &str)],
    ) -> Result<String> {
        let base_string = signature_base_string(method, url, parameters, oauth_parameters);
        trace!(%base_string, "signing request");

        let signing_key = format!(
            "{}&{}",
            percent_encode(self.consumer_secret),
            percent_encode(self.token_secret.unwrap_or_default())
        );
        let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes())
            .map_err(|e| Error::oauth("signing", e.to_string()))?;
        mac.update(base_string.as_bytes());
        Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn signature_base_string(
    method: &Method,
    url: &Url,
    parameters: &[(String, String)],
    oauth_parameters: &[(&str, &str)],
) -> String {
    let mut normalized: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .chain(
            parameters
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .chain(
            oauth_parameters
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    normalized.sort_unstable();

    let parameter_string = normalized
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let base_url = format!("{}{}", url.origin().ascii_serialization(), url.path());

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(&base_url),
        percent_encode(&parameter_string)
    )
}

/// The request-token, user-authorization and access-token exchange.
///
/// Implementations resolve with the parameters of the access token response, which
/// include at least `oauth_token` and `oauth_token_secret`.
#[async_trait]
pub trait OAuthHandshake: Send + Sync {
    async fn authorize(
        &self,
        parameters: &OauthParameters,
        callback_url: &str,
        handler: &dyn AuthorizeUrlHandler,
        callbacks: CallbackReceiver,
    ) -> Result<HashMap<String, String>>;
}

/// [`OAuthHandshake`] speaking form-encoded OAuth 1.0a over reqwest.
#[derive(Debug, Clone, Default)]
pub struct OAuth1Handshake {
    http: reqwest::Client,
}

impl OAuth1Handshake {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn token_request(
        &self,
        stage: &'static str,
        url: &str,
        signer: &Signer<'_>,
        extra: &[(&str, &str)],
    ) -> Result<HashMap<String, String>> {
        let url = Url::parse(url).map_err(|_| Error::InvalidEndpoint {
            url: url.to_string(),
        })?;
        let authorization = signer.authorization_header(&Method::POST, &url, &[], extra)?;

        trace!(%url, stage, "requesting token");
        let response = self
            .http
            .post(url)
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("{stage} request failed with status {status}");
            return Err(Error::oauth(stage, format!("{status}: {text}")));
        }

        let values: HashMap<String, String> = url::form_urlencoded::parse(text.as_bytes())
            .into_owned()
            .collect();
        for key in [OAUTH_TOKEN, OAUTH_TOKEN_SECRET] {
            if !values.contains_key(key) {
                return Err(Error::oauth(stage, format!("response is missing {key}")));
            }
        }
        Ok(values)
    }
}

fn verifier_for(url: &Url, request_token: &str) -> Option<String> {
    let mut token = None;
    let mut verifier = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            OAUTH_TOKEN => token = Some(value.into_owned()),
            OAUTH_VERIFIER => verifier = Some(value.into_owned()),
            _ => {}
        }
    }
    match token {
        Some(token) if token != request_token => None,
        _ => verifier,
    }
}

#[async_trait]
impl OAuthHandshake for OAuth1Handshake {
    #[instrument(skip_all)]
    async fn authorize(
        &self,
        parameters: &OauthParameters,
        callback_url: &str,
        handler: &dyn AuthorizeUrlHandler,
        mut callbacks: CallbackReceiver,
    ) -> Result<HashMap<String, String>> {
        let consumer = Signer::new(&parameters.consumer_key, &parameters.consumer_secret);
        let request_token = self
            .token_request(
                "request token",
                &parameters.request_token_url,
                &consumer,
                &[(OAUTH_CALLBACK, callback_url)],
            )
            .await?;
        let token = &request_token[OAUTH_TOKEN];
        let token_secret = &request_token[OAUTH_TOKEN_SECRET];

        let mut authorize_url =
            Url::parse(&parameters.authorize_url).map_err(|_| Error::InvalidEndpoint {
                url: parameters.authorize_url.clone(),
            })?;
        authorize_url
            .query_pairs_mut()
            .append_pair(OAUTH_TOKEN, token);
        debug!("waiting for the user to authorize the request token");
        handler.open(&authorize_url)?;

        let verifier = callbacks
            .first_matching(|url| verifier_for(url, token))
            .await?;

        let signer = consumer.with_token(Some(token.as_str()), Some(token_secret.as_str()));
        let access_token = self
            .token_request(
                "access token",
                &parameters.access_token_url,
                &signer,
                &[(OAUTH_VERIFIER, verifier.as_str())],
            )
            .await?;
        info!("obtained OAuth access token");
        Ok(access_token)
    }
}
