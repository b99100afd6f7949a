use crate::error::{Error, Result};
use crate::oauth::Credential;

/// The tenant and token a [`Client`](crate::Client) sends with every request.
///
/// A session is empty until [`Session::set`] is called with the values of a
/// previous [`AuthorizationResponse`](crate::AuthorizationResponse).
#[derive(Clone, Default)]
pub struct Session {
    tenant_id: Option<String>,
    oauth_token: Option<String>,
    oauth_token_secret: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(tenant_id: String, token: String, secret: String) -> Self {
        let mut session = Self::default();
        session.set(tenant_id, token, secret);
        session
    }

    pub fn set(&mut self, tenant_id: String, token: String, secret: String) {
        trace!(%tenant_id, "updating session");
        self.tenant_id = Some(tenant_id);
        self.oauth_token = Some(token);
        self.oauth_token_secret = Some(secret);
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// The tenant id, or a configuration error when the session was never set.
    pub fn require_tenant_id(&self) -> Result<&str> {
        self.tenant_id().ok_or_else(Error::missing_tenant_id)
    }

    #[must_use]
    pub fn credential(&self) -> Credential {
        Credential {
            token: self.oauth_token.clone(),
            token_secret: self.oauth_token_secret.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tenant_id", &self.tenant_id)
            .field("oauth_token", &self.oauth_token.as_ref().map(|_| "<redacted>"))
            .field(
                "oauth_token_secret",
                &self.oauth_token_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
