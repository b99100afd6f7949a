//! # quickbooks-rs
//!
//! A Rust client library for the QuickBooks Online accounting API: OAuth 1.0a
//! authorization, invoice, bill and purchase queries, and financial reports.
//!
//! ```ignore
//! use quickbooks_rs::{Client, endpoints::Environment, oauth::OauthParameters};
//! use quickbooks_rs::query::Condition;
//!
//! let mut client = Client::new(OauthParameters::from_env()?, Environment::Sandbox)?;
//! client.set_session(realm_id, token, token_secret);
//!
//! let this_month = Condition::month_of(time::OffsetDateTime::now_utc().date());
//! for invoice in client.get_invoices(Some(this_month)).await? {
//!     println!("{} {} {}", invoice.pretty_date_string(), invoice.customer_name(), invoice.total_amt);
//! }
//! ```
//!
//! ## Authorization
//!
//! QuickBooks returns the company (realm) id only on the redirect the host
//! application receives. Forward every redirect to a [`CallbackHub`] and let
//! [`Client::authorize`] join it with the OAuth token exchange:
//!
//! ```ignore
//! let hub = CallbackHub::new();
//! // in the web handler serving the callback url:
//! hub.deliver(redirect_url);
//!
//! let response = client.authorize(Arc::new(LogUrlHandler), &hub).await?;
//! client.set_session(response.tenant_id, response.token, response.token_secret);
//! ```
//!
//! ## Sentry Integration
//!
//! Errors include async span traces that capture the call stack at the point of
//! error creation. Enable the `sentry` feature for breadcrumb conversion and set up
//! tracing with `ErrorLayer`:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())  // Required for SpanTrace capture
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod callback;
pub mod client;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod oauth;
pub mod query;
pub mod report;
pub mod router;
pub mod session;
pub mod transport;
pub mod utils;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use callback::{AuthorizeUrlHandler, CallbackHub, LogUrlHandler};
pub use client::{AuthorizationResponse, Client};
pub use endpoints::{Environment, QuickbooksEndpoint};
pub use error::{Error, ErrorKind, Result};
pub use oauth::OauthParameters;
pub use query::{Condition, QueryObject, QueryRequest};
pub use report::{PredefinedDateRange, ReportRequest, ReportType};
pub use session::Session;

// Re-export entity types for convenience
pub use entities::{
    Transaction,
    bill::Bill,
    invoice::Invoice,
    purchase::Purchase,
    report::{KpiInfo, Report},
};

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;
