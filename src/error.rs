use std::fmt;
use std::time::Duration;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use tracing_error::SpanTrace;

/// A single entry of the `Fault.Error` array returned by QuickBooks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaultError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default, rename = "code")]
    pub code: Option<String>,
    #[serde(default, rename = "element")]
    pub element: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Fault {
    #[serde(default, rename = "Error", alias = "error")]
    pub errors: Vec<FaultError>,
    #[serde(default, rename = "type")]
    pub r#type: Option<String>,
}

/// The error body QuickBooks returns for rejected requests, e.g. a `ValidationFault`
/// or a `QueryParserError`.
#[derive(Debug, Clone, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct FaultResponse {
    #[serde(rename = "Fault", alias = "fault")]
    pub fault: Fault,
    #[serde(default)]
    pub time: Option<String>,
}

impl FaultResponse {
    /// The fault type reported by the API, `"Unknown"` when absent.
    #[must_use]
    pub fn fault_type(&self) -> &str {
        self.fault.r#type.as_deref().unwrap_or("Unknown")
    }
}

impl fmt::Display for FaultResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuickBooks {}", self.fault_type())?;
        for error in &self.fault.errors {
            write!(f, "; {}", error.message)?;
            if let Some(code) = &error.code {
                write!(f, " (code {code})")?;
            }
            if let Some(detail) = &error.detail {
                write!(f, ": {detail}")?;
            }
        }
        Ok(())
    }
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ErrorKind {
    /// Setup or programmer error: missing tenant id, callback URL or base URL.
    Configuration,
    /// Network failures and non-success responses.
    Transport,
    /// The payload did not have the expected shape.
    Parse,
    /// The authorization handshake never completed.
    Authorization,
}

/// Errors that can occur when interacting with the QuickBooks API.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("no tenant (realm) id is set on the session")]
    #[diagnostic(
        code(quickbooks_rs::missing_tenant_id),
        help("Call `Client::set_session` with the realm id, token and secret before querying")
    )]
    MissingTenantId { span_trace: SpanTrace },

    #[error("the OAuth parameters have no callback url")]
    #[diagnostic(
        code(quickbooks_rs::missing_callback_url),
        help("Provide a callback url in `OauthParameters` before authorizing")
    )]
    MissingCallbackUrl { span_trace: SpanTrace },

    #[error("endpoint could not be parsed as a URL: {url:?}")]
    #[diagnostic(
        code(quickbooks_rs::invalid_endpoint),
        help("Check that the API base URL is set and correctly formatted")
    )]
    InvalidEndpoint { url: String },

    #[error("missing configuration value: {variable}")]
    #[diagnostic(
        code(quickbooks_rs::missing_configuration),
        help("Set the {variable} environment variable")
    )]
    MissingConfiguration { variable: String },

    #[error("invalid value {value:?} for {variable}, expected one of: {expected}")]
    #[diagnostic(
        code(quickbooks_rs::invalid_configuration),
        help("Set {variable} to one of: {expected}")
    )]
    InvalidConfiguration {
        variable: String,
        value: String,
        expected: &'static str,
    },

    #[error("error making request: {source}")]
    #[diagnostic(
        code(quickbooks_rs::request_error),
        help("Check your network connection and QuickBooks API availability")
    )]
    Request {
        #[source]
        source: reqwest::Error,
        span_trace: SpanTrace,
    },

    /// A fault returned by the API, such as a `ValidationFault`.
    #[error("encountered API fault: {response}")]
    #[diagnostic(
        code(quickbooks_rs::api_fault),
        help("Review the fault details returned by the QuickBooks API")
    )]
    API {
        response: FaultResponse,
        status_code: reqwest::StatusCode,
        url: String,
        span_trace: SpanTrace,
    },

    #[error("request was not authorized ({status_code}) for {url}")]
    #[diagnostic(
        code(quickbooks_rs::unauthorized),
        help("The OAuth token may be expired or revoked; authorize again")
    )]
    Unauthorized {
        status_code: reqwest::StatusCode,
        url: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("unexpected status code {status_code} from {url}")]
    #[diagnostic(code(quickbooks_rs::unexpected_status))]
    UnexpectedStatus {
        status_code: reqwest::StatusCode,
        url: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("oauth error during {stage}: {message}")]
    #[diagnostic(
        code(quickbooks_rs::oauth_error),
        help("Verify your consumer key, consumer secret and OAuth endpoint URLs")
    )]
    OAuth {
        stage: &'static str,
        message: String,
        span_trace: SpanTrace,
    },

    #[error("error decoding {entity_type}: {source}")]
    #[diagnostic(
        code(quickbooks_rs::deserialization_error),
        help("The API returned data in an unexpected format")
    )]
    DeserializationError {
        #[source]
        source: serde_json::Error,
        entity_type: String,
        response_body: Option<String>,
        span_trace: SpanTrace,
    },

    #[error("authorization did not complete within {timeout:?}")]
    #[diagnostic(
        code(quickbooks_rs::authorization_timeout),
        help("Make sure the host application forwards the OAuth redirect to the callback hub")
    )]
    AuthorizationTimeout { timeout: Duration },

    #[error("the callback hub closed before a redirect arrived")]
    #[diagnostic(code(quickbooks_rs::callback_closed))]
    CallbackClosed,
}

impl Error {
    pub(crate) fn missing_tenant_id() -> Self {
        Self::MissingTenantId {
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn missing_callback_url() -> Self {
        Self::MissingCallbackUrl {
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn oauth(stage: &'static str, message: impl Into<String>) -> Self {
        Self::OAuth {
            stage,
            message: message.into(),
            span_trace: SpanTrace::capture(),
        }
    }

    pub(crate) fn deserialization(
        source: serde_json::Error,
        entity_type: impl Into<String>,
        response_body: Option<String>,
    ) -> Self {
        Self::DeserializationError {
            source,
            entity_type: entity_type.into(),
            response_body,
            span_trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingTenantId { .. }
            | Self::MissingCallbackUrl { .. }
            | Self::InvalidEndpoint { .. }
            | Self::MissingConfiguration { .. }
            | Self::InvalidConfiguration { .. } => ErrorKind::Configuration,
            Self::Request { .. }
            | Self::API { .. }
            | Self::Unauthorized { .. }
            | Self::UnexpectedStatus { .. }
            | Self::OAuth { .. } => ErrorKind::Transport,
            Self::DeserializationError { .. } => ErrorKind::Parse,
            Self::AuthorizationTimeout { .. } | Self::CallbackClosed => ErrorKind::Authorization,
        }
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// The span trace captured when the error was created, if any.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::MissingTenantId { span_trace }
            | Self::MissingCallbackUrl { span_trace }
            | Self::Request { span_trace, .. }
            | Self::API { span_trace, .. }
            | Self::Unauthorized { span_trace, .. }
            | Self::UnexpectedStatus { span_trace, .. }
            | Self::OAuth { span_trace, .. }
            | Self::DeserializationError { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::API { url, .. }
            | Self::Unauthorized { url, .. }
            | Self::UnexpectedStatus { url, .. }
            | Self::InvalidEndpoint { url } => Some(url),
            Self::Request { source, .. } => source.url().map(url::Url::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::API { status_code, .. }
            | Self::Unauthorized { status_code, .. }
            | Self::UnexpectedStatus { status_code, .. } => Some(*status_code),
            Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { response_body, .. }
            | Self::UnexpectedStatus { response_body, .. }
            | Self::DeserializationError { response_body, .. } => response_body.as_deref(),
            _ => None,
        }
    }

    /// The API fault, when the error came from a fault response.
    #[must_use]
    pub fn fault(&self) -> Option<&FaultResponse> {
        match self {
            Self::API { response, .. } => Some(response),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Self::Request {
            source,
            span_trace: SpanTrace::capture(),
        }
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;
