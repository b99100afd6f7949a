#[macro_use]
extern crate tracing;

use anyhow::{Context, Result};

use quickbooks_rs::{
    Client, Environment, OauthParameters, PredefinedDateRange, ReportRequest, ReportType,
    report::SummarizeBy,
};

/// Fetches the summary reports of a previously authorized company.
///
/// Expects `QUICKBOOKS_REALM_ID`, `QUICKBOOKS_TOKEN` and `QUICKBOOKS_TOKEN_SECRET`
/// next to the consumer credentials.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut client = Client::new(OauthParameters::from_env()?, Environment::from_env()?)?;
    client.set_session(
        std::env::var("QUICKBOOKS_REALM_ID").context("QUICKBOOKS_REALM_ID")?,
        std::env::var("QUICKBOOKS_TOKEN").context("QUICKBOOKS_TOKEN")?,
        std::env::var("QUICKBOOKS_TOKEN_SECRET").context("QUICKBOOKS_TOKEN_SECRET")?,
    );

    let requests = [
        ReportRequest::new(ReportType::ProfitAndLoss, PredefinedDateRange::ThisMonth),
        ReportRequest::new(ReportType::BalanceSheet, PredefinedDateRange::ThisQuarter),
        ReportRequest::new(ReportType::CustomerIncome, PredefinedDateRange::ThisYear)
            .summarize_by(SummarizeBy::Customers),
        ReportRequest::new(ReportType::VendorExpenses, PredefinedDateRange::ThisYear),
    ];

    for request in &requests {
        match client.get_report(request).await {
            Ok(report) => {
                info!("{} ({} rows)", report.name, report.rows.len());
                for kpi in report.kpis() {
                    info!("  {}: {}", kpi.title, kpi.value);
                }
            }
            Err(e) => error!("{} failed: {:?}", request.report_type(), miette::Report::new(e)),
        }
    }

    Ok(())
}
