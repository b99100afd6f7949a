use std::fmt;

use url::Url;

use crate::error::{Error, Result};
use crate::report::ReportType;

pub const PRODUCTION_BASE_URL: &str = "https://quickbooks.api.intuit.com/v3/company/";
pub const SANDBOX_BASE_URL: &str = "https://sandbox-quickbooks.api.intuit.com/v3/company/";

/// Which QuickBooks deployment the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Sandbox,
    /// Any other base URL, e.g. a local mock server.
    Custom(String),
}

impl Environment {
    /// Reads `QUICKBOOKS_BASE_URL` (custom) or `QUICKBOOKS_ENVIRONMENT`
    /// (`production` or `sandbox`, defaulting to sandbox).
    pub fn from_env() -> Result<Self> {
        if let Ok(base_url) = std::env::var("QUICKBOOKS_BASE_URL") {
            return Ok(Self::Custom(base_url));
        }
        match std::env::var("QUICKBOOKS_ENVIRONMENT").as_deref() {
            Ok("production") => Ok(Self::Production),
            Ok("sandbox") | Err(_) => Ok(Self::Sandbox),
            Ok(value) => Err(Error::InvalidConfiguration {
                variable: "QUICKBOOKS_ENVIRONMENT".to_string(),
                value: value.to_string(),
                expected: "production, sandbox",
            }),
        }
    }

    /// Parses the base URL of this environment.
    pub fn base_url(&self) -> Result<Url> {
        let raw = match self {
            Self::Production => PRODUCTION_BASE_URL,
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Custom(url) => url.as_str(),
        };
        let invalid = || Error::InvalidEndpoint {
            url: raw.to_string(),
        };
        if raw.trim().is_empty() {
            return Err(invalid());
        }
        let url = Url::parse(raw).map_err(|_| invalid())?;
        if url.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(url)
    }
}

/// A typed representation of the company-scoped endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickbooksEndpoint {
    Query,
    Report(ReportType),
}

impl QuickbooksEndpoint {
    /// Builds `<base>/<tenant_id>/query` or `<base>/<tenant_id>/reports/<ReportType>`.
    pub fn to_url(&self, base: &Url, tenant_id: &str) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::InvalidEndpoint {
                url: base.to_string(),
            })?;
            segments.pop_if_empty().push(tenant_id);
            match self {
                Self::Query => {
                    segments.push("query");
                }
                Self::Report(report_type) => {
                    segments.push("reports").push(report_type.as_str());
                }
            }
        }
        Ok(url)
    }
}

impl fmt::Display for QuickbooksEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Report(report_type) => write!(f, "reports/{report_type}"),
        }
    }
}
