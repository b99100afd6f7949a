use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::callback::{self, AuthorizeUrlHandler, CallbackHub};
use crate::endpoints::Environment;
use crate::entities::{
    self, Transaction,
    bill::Bill,
    invoice::Invoice,
    purchase::Purchase,
    report::Report,
};
use crate::error::{Error, Result};
use crate::oauth::{OAUTH_TOKEN, OAUTH_TOKEN_SECRET, OAuth1Handshake, OAuthHandshake, OauthParameters};
use crate::query::{Condition, QueryRequest};
use crate::report::ReportRequest;
use crate::router::{Operation, Router};
use crate::session::Session;
use crate::transport::{ReqwestTransport, SignedTransport};

/// How long [`Client::authorize`] waits for the user by default.
pub const DEFAULT_AUTHORIZE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// The result of a completed authorization. Persist it to restore the session later
/// with [`Client::set_session`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    pub token: String,
    pub tenant_id: String,
    pub token_secret: String,
}

impl AuthorizationResponse {
    #[must_use]
    pub fn into_session(self) -> Session {
        Session::new(self.tenant_id, self.token, self.token_secret)
    }
}

impl std::fmt::Debug for AuthorizationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationResponse")
            .field("tenant_id", &self.tenant_id)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
/// This is the client that is used for interacting with the QuickBooks API. It holds the
/// OAuth consumer configuration and the current session (tenant and user token).
pub struct Client {
    router: Router,
    session: Session,
    authorize_timeout: Duration,
}

impl Client {
    /// Creates a client for `environment` using the reqwest based transport and handshake.
    ///
    /// # Errors
    /// Returns a configuration error if the environment's base URL is invalid, or a
    /// request error if the HTTP client can't be built.
    #[instrument]
    pub fn new(parameters: OauthParameters, environment: Environment) -> Result<Self> {
        let base_url = environment.base_url()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let transport = Arc::new(ReqwestTransport::new(http.clone(), &parameters));
        let handshake = Arc::new(OAuth1Handshake::new(http));
        Ok(Self::with_collaborators(parameters, base_url, transport, handshake))
    }

    /// Creates a client around custom transport and handshake implementations.
    #[must_use]
    pub fn with_collaborators(
        parameters: OauthParameters,
        base_url: Url,
        transport: Arc<dyn SignedTransport>,
        handshake: Arc<dyn OAuthHandshake>,
    ) -> Self {
        Self {
            router: Router::new(parameters, base_url, transport, handshake),
            session: Session::default(),
            authorize_timeout: DEFAULT_AUTHORIZE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_authorize_timeout(mut self, timeout: Duration) -> Self {
        self.authorize_timeout = timeout;
        self
    }

    /// Sets the tenant and user token sent with every subsequent request.
    pub fn set_session(&mut self, tenant_id: String, token: String, secret: String) {
        self.session.set(tenant_id, token, secret);
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Runs the OAuth flow and resolves once both the access token and the realm id
    /// of the redirect delivered to `callbacks` are known.
    ///
    /// The session is left untouched; pass the response to [`Client::set_session`].
    ///
    /// # Errors
    /// Fails with a configuration error without a callback URL, with
    /// [`Error::AuthorizationTimeout`] when the user doesn't finish in time, and with
    /// any error of the handshake itself.
    #[instrument(skip(self, handler, callbacks))]
    pub async fn authorize(
        &self,
        handler: Arc<dyn AuthorizeUrlHandler>,
        callbacks: &CallbackHub,
    ) -> Result<AuthorizationResponse> {
        // Both receivers must exist before the authorization URL is opened.
        let handshake_callbacks = callbacks.subscribe();
        let realm_callbacks = callbacks.subscribe();

        let tokens = self.router.execute(
            &self.session,
            Operation::Authorize {
                handler,
                callbacks: handshake_callbacks,
            },
        );
        let realm_id = callback::realm_id(realm_callbacks);

        let (tokens, tenant_id) = tokio::time::timeout(self.authorize_timeout, async {
            tokio::try_join!(tokens, realm_id)
        })
        .await
        .map_err(|_| {
            warn!(timeout = ?self.authorize_timeout, "authorization was not completed in time");
            Error::AuthorizationTimeout {
                timeout: self.authorize_timeout,
            }
        })??;

        let token_value = |key: &str| {
            tokens
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| Error::oauth("access token", format!("response is missing {key}")))
        };

        let response = AuthorizationResponse {
            token: token_value(OAUTH_TOKEN)?,
            tenant_id,
            token_secret: token_value(OAUTH_TOKEN_SECRET)?,
        };
        info!(tenant_id = %response.tenant_id, "authorized");
        Ok(response)
    }

    /// Runs a query and returns the raw payload.
    ///
    /// # Errors
    /// Fails with a configuration error when no session is set.
    #[instrument(skip(self))]
    pub async fn query(&self, request: &QueryRequest) -> Result<Value> {
        self.router
            .execute(&self.session, Operation::Query(request.clone()))
            .await
    }

    /// Queries every record of `T` matching `condition`.
    #[instrument(skip(self))]
    pub async fn get_transactions<T: Transaction>(
        &self,
        condition: Option<Condition>,
    ) -> Result<Vec<T>> {
        let payload = self.query(&QueryRequest::new(T::OBJECT, condition)).await?;
        let records = entities::from_query_response::<T>(payload)?;
        debug!(object = %T::OBJECT, count = records.len(), "mapped query response");
        Ok(records)
    }

    pub async fn get_invoices(&self, condition: Option<Condition>) -> Result<Vec<Invoice>> {
        self.get_transactions(condition).await
    }

    pub async fn get_bills(&self, condition: Option<Condition>) -> Result<Vec<Bill>> {
        self.get_transactions(condition).await
    }

    pub async fn get_purchases(&self, condition: Option<Condition>) -> Result<Vec<Purchase>> {
        self.get_transactions(condition).await
    }

    /// Fetches and maps a report.
    #[instrument(skip(self))]
    pub async fn get_report(&self, request: &ReportRequest) -> Result<Report> {
        let payload = self
            .router
            .execute(&self.session, Operation::Report(request.clone()))
            .await?;
        Report::from_json(payload)
    }
}
