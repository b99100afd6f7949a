#[macro_use]
extern crate tracing;

use std::sync::Arc;

use anyhow::Result;
use url::Url;
use warp::Filter;

use quickbooks_rs::{
    CallbackHub, Client, Condition, Environment, LogUrlHandler, OauthParameters,
    PredefinedDateRange, ReportRequest, ReportType, Transaction,
};

const CALLBACK_URL: &str = "http://localhost:4000/oauth-callback";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let hub = CallbackHub::new();

    // Serve the OAuth callback locally and forward every redirect to the hub
    let relay = hub.clone();
    let callback = warp::get()
        .and(warp::path("oauth-callback"))
        .and(warp::query::raw())
        .map(move |query: String| {
            match Url::parse(&format!("{CALLBACK_URL}?{query}")) {
                Ok(url) => {
                    relay.deliver(url);
                }
                Err(e) => warn!("ignoring malformed redirect: {e}"),
            }
            warp::reply::html("QuickBooks is connected, you can close this window.")
        });
    tokio::spawn(warp::serve(callback).run(([127, 0, 0, 1], 4000)));

    let mut parameters = OauthParameters::from_env()?;
    parameters.callback_url.get_or_insert_with(|| CALLBACK_URL.to_string());
    let mut client = Client::new(parameters, Environment::from_env()?)?;

    // The authorization URL is logged; open it in a browser to continue
    let response = client.authorize(Arc::new(LogUrlHandler), &hub).await?;
    info!("authorized realm {}", response.tenant_id);
    client.set_session(response.tenant_id, response.token, response.token_secret);

    let this_month = Condition::month_of(time::OffsetDateTime::now_utc().date());
    let invoices = client.get_invoices(Some(this_month)).await?;
    info!("Found {} invoices this month", invoices.len());
    for invoice in &invoices {
        info!(
            "{} {} {} (balance {})",
            invoice.pretty_date_string(),
            invoice.customer_name(),
            invoice.total_amt,
            invoice.balance
        );
    }

    let report = client
        .get_report(&ReportRequest::new(
            ReportType::ProfitAndLoss,
            PredefinedDateRange::ThisMonth,
        ))
        .await?;
    info!("{} {}..{}", report.name, report.start_period, report.end_period);

    Ok(())
}
