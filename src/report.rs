use std::fmt;

/// Report endpoints exposed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    BalanceSheet,
    AccountList,
    CustomerIncome,
    VendorExpenses,
    ProfitAndLoss,
}

impl ReportType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BalanceSheet => "BalanceSheet",
            Self::AccountList => "AccountList",
            Self::CustomerIncome => "CustomerIncome",
            Self::VendorExpenses => "VendorExpenses",
            Self::ProfitAndLoss => "ProfitAndLoss",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side date macros, sent as `date_macro` instead of explicit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedDateRange {
    Today,
    Yesterday,
    ThisMonth,
    ThisQuarter,
    ThisYear,
}

impl PredefinedDateRange {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisMonth => "This Month",
            Self::ThisQuarter => "This Fiscal Quarter",
            Self::ThisYear => "This Fiscal Year",
        }
    }
}

/// Column grouping for reports that support `summarize_column_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummarizeBy {
    Days,
    Month,
    Customers,
}

impl SummarizeBy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "Days",
            Self::Month => "Month",
            Self::Customers => "Customers",
        }
    }
}

pub const DATE_MACRO_PARAMETER: &str = "date_macro";
pub const SUMMARIZE_BY_PARAMETER: &str = "summarize_column_by";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    r#type: ReportType,
    period: PredefinedDateRange,
    summarize_by: Option<SummarizeBy>,
}

impl ReportRequest {
    #[must_use]
    pub fn new(r#type: ReportType, period: PredefinedDateRange) -> Self {
        Self {
            r#type,
            period,
            summarize_by: None,
        }
    }

    #[must_use]
    pub fn summarize_by(mut self, summarize_by: SummarizeBy) -> Self {
        self.summarize_by = Some(summarize_by);
        self
    }

    #[must_use]
    pub fn report_type(&self) -> ReportType {
        self.r#type
    }

    /// Path suffix under `reports/`.
    #[must_use]
    pub fn path_component(&self) -> &'static str {
        self.r#type.as_str()
    }

    #[must_use]
    pub fn period_string_representation(&self) -> &'static str {
        self.period.as_str()
    }

    /// Query parameters for the report endpoint.
    #[must_use]
    pub fn parameters(&self) -> Vec<(String, String)> {
        let mut parameters = vec![(
            DATE_MACRO_PARAMETER.to_string(),
            self.period_string_representation().to_string(),
        )];
        if let Some(summarize_by) = self.summarize_by {
            parameters.push((
                SUMMARIZE_BY_PARAMETER.to_string(),
                summarize_by.as_str().to_string(),
            ));
        }
        parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_type_and_period() {
        let request = ReportRequest::new(ReportType::ProfitAndLoss, PredefinedDateRange::ThisQuarter);
        assert_eq!(request.path_component(), "ProfitAndLoss");
        assert_eq!(request.period_string_representation(), "This Fiscal Quarter");
        assert_eq!(
            request.parameters(),
            vec![("date_macro".to_string(), "This Fiscal Quarter".to_string())]
        );
    }

    #[test]
    fn summarize_by_adds_a_parameter() {
        let request = ReportRequest::new(ReportType::CustomerIncome, PredefinedDateRange::ThisMonth)
            .summarize_by(SummarizeBy::Customers);
        assert_eq!(
            request.parameters(),
            vec![
                ("date_macro".to_string(), "This Month".to_string()),
                ("summarize_column_by".to_string(), "Customers".to_string()),
            ]
        );
    }
}
