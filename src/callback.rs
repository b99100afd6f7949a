//! Delivery of the OAuth redirect the host application receives.
//!
//! QuickBooks sends the user back to the configured callback URL with the
//! `oauth_token`, `oauth_verifier` and `realmId` query parameters. The host
//! application (a web handler, a custom URL scheme handler, ...) forwards that
//! URL to a [`CallbackHub`]; the OAuth handshake and the realm id observer each
//! hold their own [`CallbackReceiver`].

use tokio::sync::broadcast;
use url::Url;

use crate::error::{Error, Result};

/// Expected length of a QuickBooks realm id.
pub const REALM_ID_LENGTH: usize = 15;

const REALM_ID_KEY: &str = "realmId";
const CHANNEL_CAPACITY: usize = 16;

/// Opens the user-authorization URL, typically in a browser.
pub trait AuthorizeUrlHandler: Send + Sync {
    fn open(&self, url: &Url) -> Result<()>;
}

impl<F> AuthorizeUrlHandler for F
where
    F: Fn(&Url) -> Result<()> + Send + Sync,
{
    fn open(&self, url: &Url) -> Result<()> {
        self(url)
    }
}

/// Logs the authorization URL so a user can open it by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogUrlHandler;

impl AuthorizeUrlHandler for LogUrlHandler {
    fn open(&self, url: &Url) -> Result<()> {
        info!("Sign in to QuickBooks: {url}");
        Ok(())
    }
}

/// Fan-out of callback URLs to every subscribed receiver.
#[derive(Debug, Clone)]
pub struct CallbackHub {
    sender: broadcast::Sender<Url>,
}

impl Default for CallbackHub {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackHub {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Hands a received redirect URL to every receiver. Returns how many receivers got it;
    /// URLs delivered while nobody listens are dropped.
    #[instrument(skip(self, url), fields(path = url.path()))]
    pub fn deliver(&self, url: Url) -> usize {
        match self.sender.send(url) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("callback delivered with no active receivers");
                0
            }
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> CallbackReceiver {
        CallbackReceiver {
            inner: self.sender.subscribe(),
        }
    }
}

#[derive(Debug)]
pub struct CallbackReceiver {
    inner: broadcast::Receiver<Url>,
}

impl CallbackReceiver {
    /// Waits for the next callback URL.
    pub async fn recv(&mut self) -> Result<Url> {
        loop {
            match self.inner.recv().await {
                Ok(url) => return Ok(url),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "callback receiver lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(Error::CallbackClosed),
            }
        }
    }

    /// Waits for the first callback URL accepted by `extract`, skipping the others.
    pub async fn first_matching<T>(&mut self, extract: impl Fn(&Url) -> Option<T>) -> Result<T> {
        loop {
            let url = self.recv().await?;
            if let Some(value) = extract(&url) {
                return Ok(value);
            }
            trace!(path = url.path(), "ignoring callback without the expected parameters");
        }
    }
}

/// Reads the `realmId` query parameter of a callback URL.
#[must_use]
pub fn find_realm_id(url: &Url) -> Option<String> {
    let realm_id = url
        .query_pairs()
        .find(|(key, _)| key == REALM_ID_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())?;

    if realm_id.len() != REALM_ID_LENGTH {
        warn!(
            length = realm_id.len(),
            expected = REALM_ID_LENGTH,
            "realm id has an unexpected length"
        );
    }
    Some(realm_id)
}

/// Resolves with the realm id of the first callback that carries one.
pub async fn realm_id(mut receiver: CallbackReceiver) -> Result<String> {
    let realm_id = receiver.first_matching(find_realm_id).await?;
    debug!(%realm_id, "received realm id from callback");
    Ok(realm_id)
}
