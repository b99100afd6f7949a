//! Resolves every API operation into one signed request.

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, header};
use serde_json::{Map, Value};
use url::Url;

use crate::callback::{AuthorizeUrlHandler, CallbackReceiver};
use crate::endpoints::QuickbooksEndpoint;
use crate::error::{Error, Result};
use crate::oauth::{OAuthHandshake, OauthParameters};
use crate::query::QueryRequest;
use crate::report::ReportRequest;
use crate::session::Session;
use crate::transport::{SignedRequest, SignedTransport};

const QUERY_PARAMETER: &str = "query";
const JSON_CONTENT_TYPE: &str = "application/json";

/// The operations a [`Router`] knows how to execute.
pub enum Operation {
    /// Runs the OAuth handshake. Redirect URLs are read from `callbacks`.
    Authorize {
        handler: Arc<dyn AuthorizeUrlHandler>,
        callbacks: CallbackReceiver,
    },
    Query(QueryRequest),
    Report(ReportRequest),
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorize { .. } => f.write_str("Authorize"),
            Self::Query(request) => f.debug_tuple("Query").field(request).finish(),
            Self::Report(request) => f.debug_tuple("Report").field(request).finish(),
        }
    }
}

#[derive(Clone)]
pub struct Router {
    parameters: OauthParameters,
    base_url: Url,
    transport: Arc<dyn SignedTransport>,
    handshake: Arc<dyn OAuthHandshake>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("parameters", &self.parameters)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Router {
    #[must_use]
    pub fn new(
        parameters: OauthParameters,
        base_url: Url,
        transport: Arc<dyn SignedTransport>,
        handshake: Arc<dyn OAuthHandshake>,
    ) -> Self {
        Self {
            parameters,
            base_url,
            transport,
            handshake,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn parameters(&self) -> &OauthParameters {
        &self.parameters
    }

    /// Executes `operation` with the credentials of `session`.
    ///
    /// Query and report operations fail with a configuration error before any
    /// network call when the session has no tenant id. Authorization resolves with
    /// the access token response as a JSON object of strings.
    #[instrument(skip(self, session))]
    pub async fn execute(&self, session: &Session, operation: Operation) -> Result<Value> {
        match operation {
            Operation::Authorize { handler, callbacks } => {
                let callback_url = self
                    .parameters
                    .callback_url
                    .as_deref()
                    .ok_or_else(Error::missing_callback_url)?;
                let values = self
                    .handshake
                    .authorize(&self.parameters, callback_url, handler.as_ref(), callbacks)
                    .await?;
                Ok(Value::Object(
                    values
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect::<Map<_, _>>(),
                ))
            }
            Operation::Query(request) => {
                let query = request.string_representation();
                debug!(%query, "running query");
                self.send(
                    session,
                    &QuickbooksEndpoint::Query,
                    vec![(QUERY_PARAMETER.to_string(), query)],
                )
                .await
            }
            Operation::Report(request) => {
                self.send(
                    session,
                    &QuickbooksEndpoint::Report(request.report_type()),
                    request.parameters(),
                )
                .await
            }
        }
    }

    async fn send(
        &self,
        session: &Session,
        endpoint: &QuickbooksEndpoint,
        parameters: Vec<(String, String)>,
    ) -> Result<Value> {
        let tenant_id = session.require_tenant_id()?;
        let url = endpoint.to_url(&self.base_url, tenant_id)?;
        trace!(%endpoint, %url, "resolved endpoint");

        self.transport
            .send(SignedRequest {
                method: Method::GET,
                url,
                parameters,
                headers: vec![(header::ACCEPT.to_string(), JSON_CONTENT_TYPE.to_string())],
                credential: session.credential(),
            })
            .await
    }
}
