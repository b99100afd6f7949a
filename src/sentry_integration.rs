//! Sentry integration for quickbooks-rs errors.
//!
//! This module is only available when the `sentry` feature is enabled.
//!
//! ```toml
//! [dependencies]
//! quickbooks-rs = { version = "0.1", features = ["sentry"] }
//! ```
//!
//! Errors raised inside an instrumented span carry a span trace once
//! `tracing_error::ErrorLayer` is installed.

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::{Error, ErrorKind};

const MAX_BODY_PREVIEW: usize = 500;

/// Convert a quickbooks-rs Error into a Sentry breadcrumb.
impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let mut data = BTreeMap::new();
        data.insert("kind".to_string(), Value::from(format!("{:?}", error.kind())));
        if let Some(url) = error.url() {
            data.insert("url".to_string(), Value::from(url.to_string()));
        }
        if let Some(status) = error.status_code() {
            data.insert("status_code".to_string(), Value::from(status.as_u16()));
        }

        let category = match error {
            Error::API { response, .. } => {
                data.insert("fault_type".to_string(), Value::from(response.fault_type()));
                "quickbooks.api"
            }
            Error::DeserializationError { entity_type, .. } => {
                data.insert("entity_type".to_string(), Value::from(entity_type.clone()));
                "http.response"
            }
            Error::OAuth { stage, .. } => {
                data.insert("stage".to_string(), Value::from(*stage));
                "auth"
            }
            _ => match error.kind() {
                ErrorKind::Configuration => "quickbooks.config",
                ErrorKind::Transport => "http.request",
                ErrorKind::Parse => "http.response",
                ErrorKind::Authorization => "auth",
            },
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(error.to_string()),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Extracts the context of an error for use as Sentry extras.
///
/// ```ignore
/// use quickbooks_rs::sentry_integration::error_to_sentry_context;
///
/// if let Err(e) = client.get_invoices(None).await {
///     sentry::configure_scope(|scope| {
///         for (key, value) in error_to_sentry_context(&e) {
///             scope.set_extra(&key, value);
///         }
///     });
/// }
/// ```
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "quickbooks.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    if let Some(url) = error.url() {
        context.insert("quickbooks.url".to_string(), Value::from(url.to_string()));
    }

    if let Some(status) = error.status_code() {
        context.insert(
            "quickbooks.status_code".to_string(),
            Value::from(status.as_u16()),
        );
    }

    if let Some(body) = error.response_body() {
        let truncated = match body.char_indices().nth(MAX_BODY_PREVIEW) {
            Some((end, _)) => format!("{}...", &body[..end]),
            None => body.to_string(),
        };
        context.insert("quickbooks.response_body".to_string(), Value::from(truncated));
    }

    if let Some(response) = error.fault() {
        context.insert(
            "quickbooks.fault_type".to_string(),
            Value::from(response.fault_type()),
        );
        if let Some(first) = response.fault.errors.first() {
            context.insert("quickbooks.message".to_string(), Value::from(first.message.clone()));
            if let Some(code) = &first.code {
                context.insert("quickbooks.code".to_string(), Value::from(code.clone()));
            }
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_become_config_breadcrumbs() {
        let breadcrumb = Breadcrumb::from(&Error::missing_tenant_id());
        assert_eq!(breadcrumb.category.as_deref(), Some("quickbooks.config"));
        assert!(error_to_sentry_context(&Error::CallbackClosed).is_empty());
    }
}
