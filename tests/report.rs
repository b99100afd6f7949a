use anyhow::Result;
use serde_json::json;

use quickbooks_rs::{
    ErrorKind, PredefinedDateRange, ReportRequest, ReportType,
    entities::report::RowType,
    report::SummarizeBy,
};

use test_utils::{BASE_URL, FakeTransport, REALM_ID, session_client};

fn profit_and_loss() -> serde_json::Value {
    json!({
        "Header": {
            "Time": "2024-01-31T09:00:00-08:00",
            "ReportName": "ProfitAndLoss",
            "DateMacro": "this month",
            "StartPeriod": "2024-01-01",
            "EndPeriod": "2024-01-31",
            "Currency": "USD"
        },
        "Columns": {
            "Column": [
                {"ColTitle": "", "ColType": "Account"},
                {"ColTitle": "Total", "ColType": "Money"}
            ]
        },
        "Rows": {
            "Row": [
                {
                    "type": "Section",
                    "group": "Income",
                    "Header": {"ColData": [{"value": "Income"}, {"value": ""}]},
                    "Rows": {
                        "Row": [
                            {
                                "type": "Data",
                                "ColData": [
                                    {"value": "Design income", "id": "82"},
                                    {"value": "2250.00"}
                                ]
                            }
                        ]
                    },
                    "Summary": {"ColData": [{"value": "Total Income"}, {"value": "2250.00"}]}
                },
                {
                    "type": "Section",
                    "group": "GrossProfit",
                    "Summary": {"ColData": [{"value": "Gross Profit"}, {"value": "2250.00"}]}
                },
                {
                    "type": "Section",
                    "group": "Expenses",
                    "Header": {"ColData": [{"value": "Expenses"}, {"value": ""}]},
                    "Rows": {
                        "Row": [
                            {
                                "type": "Data",
                                "ColData": [{"value": "Rent", "id": "17"}, {"value": "900.00"}]
                            }
                        ]
                    },
                    "Summary": {"ColData": [{"value": "Total Expenses"}, {"value": "900.00"}]}
                }
            ]
        }
    })
}

#[tokio::test]
async fn report_is_fetched_and_mapped() -> Result<()> {
    test_utils::do_setup();
    let transport = FakeTransport::returning(profit_and_loss());
    let client = session_client(transport.clone());

    let report = client
        .get_report(&ReportRequest::new(
            ReportType::ProfitAndLoss,
            PredefinedDateRange::ThisMonth,
        ))
        .await?;

    assert_eq!(report.name, "ProfitAndLoss");
    assert_eq!(report.start_period, "2024-01-01");
    assert_eq!(report.end_period, "2024-01-31");
    assert_eq!(report.columns.len(), 2);
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.rows[0].row_type, RowType::Section);
    assert_eq!(report.rows[0].header, "Income ");
    assert_eq!(report.rows[0].column_data, vec!["Total Income", "2250.00"]);

    // The walk stops at "Gross Profit", which has no subrows.
    assert_eq!(report.title_value_dict.len(), 1);
    assert_eq!(
        report.title_value_dict.get("Total Income").map(String::as_str),
        Some("2250.00")
    );
    assert!(!report.title_value_dict.contains_key("Total Expenses"));

    let request = transport.single_request();
    assert_eq!(
        request.url.as_str(),
        format!("{BASE_URL}{REALM_ID}/reports/ProfitAndLoss")
    );
    assert_eq!(
        request.parameters,
        vec![("date_macro".to_string(), "This Month".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn summarized_report_sends_the_column_parameter() -> Result<()> {
    let transport = FakeTransport::returning(json!({
        "Header": {"ReportName": "CustomerIncome"},
        "Columns": {"Column": []},
        "Rows": {}
    }));
    let client = session_client(transport.clone());

    let report = client
        .get_report(
            &ReportRequest::new(ReportType::CustomerIncome, PredefinedDateRange::ThisYear)
                .summarize_by(SummarizeBy::Customers),
        )
        .await?;
    assert!(report.rows.is_empty());
    assert!(report.kpis().is_empty());

    let request = transport.single_request();
    assert!(request.url.path().ends_with("/reports/CustomerIncome"));
    assert_eq!(request.parameters[0].1, "This Fiscal Year");
    assert_eq!(request.parameters[1].0, "summarize_column_by");
    Ok(())
}

#[tokio::test]
async fn unknown_row_type_fails_the_report() {
    let client = session_client(FakeTransport::returning(json!({
        "Rows": {"Row": [{"type": "Banner"}]}
    })));
    let error = client
        .get_report(&ReportRequest::new(
            ReportType::BalanceSheet,
            PredefinedDateRange::Today,
        ))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Parse);
}
