use anyhow::Result;
use rust_decimal_macros::dec;
use serde_json::json;
use time::macros::{date, datetime};
use url::Url;

use quickbooks_rs::{Client, Condition, ErrorKind, Transaction};

use test_utils::{BASE_URL, FakeHandshake, FakeTransport, REALM_ID, oauth_parameters, session_client};

#[tokio::test]
async fn invoices_are_queried_and_mapped() -> Result<()> {
    test_utils::do_setup();
    let transport = FakeTransport::returning(json!({
        "QueryResponse": {
            "Invoice": [
                {
                    "Id": "130",
                    "Balance": 10.0,
                    "TotalAmt": 100.0,
                    "DocNumber": "A1",
                    "CustomerRef": {"value": "1", "name": "Acme"},
                    "TxnDate": "2023-01-15",
                    "DueDate": "2023-02-15"
                },
                {
                    "Id": 131,
                    "TotalAmt": 42.5,
                    "CustomerRef": {"value": "2", "name": "Globex"},
                    "TxnDate": "2023-01-20"
                }
            ],
            "startPosition": 1,
            "maxResults": 2
        },
        "time": "2023-01-31T10:00:00.000-08:00"
    }));
    let client = session_client(transport.clone());

    let invoices = client
        .get_invoices(Some(Condition::month_of(date!(2023 - 01 - 15))))
        .await?;

    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].id(), 130);
    assert_eq!(invoices[0].customer_name(), "Acme");
    assert_eq!(invoices[0].pretty_date_string(), "15/01/2023");
    assert_eq!(invoices[0].due_date_string(), Some("2023-02-15"));
    assert_eq!(invoices[1].total_amt(), dec!(42.5));
    assert!(invoices[1].due_date.is_none());

    let request = transport.single_request();
    assert_eq!(request.method, reqwest::Method::GET);
    assert_eq!(
        request.url.as_str(),
        format!("{BASE_URL}{REALM_ID}/query")
    );
    assert_eq!(
        request.parameters,
        vec![(
            "query".to_string(),
            "SELECT * FROM Invoice WHERE TxnDate >= 2023-01-01T00:00:00 AND TxnDate <= 2023-01-31T00:00:00"
                .to_string()
        )]
    );
    assert!(
        request
            .headers
            .contains(&("accept".to_string(), "application/json".to_string()))
    );
    assert_eq!(request.credential.token.as_deref(), Some("token"));
    assert_eq!(request.credential.token_secret.as_deref(), Some("secret"));
    Ok(())
}

#[tokio::test]
async fn bills_and_purchases_use_their_object_names() -> Result<()> {
    test_utils::do_setup();
    let transport = FakeTransport::returning(json!({
        "QueryResponse": {
            "Bill": [{"Id": "7", "TotalAmt": 250, "TxnDate": "2024-03-01"}]
        }
    }));
    let client = session_client(transport.clone());

    let bills = client.get_bills(None).await?;
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].id(), 7);
    assert_eq!(bills[0].total_amt(), dec!(250));
    assert!(bills[0].due_date().is_none());

    // Same payload has no purchases
    let purchases = client.get_purchases(None).await?;
    assert!(purchases.is_empty());

    let queries: Vec<String> = transport
        .requests()
        .into_iter()
        .map(|request| request.parameters[0].1.clone())
        .collect();
    assert_eq!(queries, vec!["SELECT * FROM Bill", "SELECT * FROM Purchase"]);
    Ok(())
}

#[tokio::test]
async fn explicit_condition_bounds() -> Result<()> {
    let transport = FakeTransport::returning(json!({"QueryResponse": {}}));
    let client = session_client(transport.clone());

    let condition = Condition::TxnDate {
        start: datetime!(2024-02-01 08:30:00),
        end: datetime!(2024-02-29 17:00:00),
    };
    assert!(client.get_purchases(Some(condition)).await?.is_empty());
    assert_eq!(
        transport.single_request().parameters[0].1,
        "SELECT * FROM Purchase WHERE TxnDate >= 2024-02-01T08:30:00 AND TxnDate <= 2024-02-29T17:00:00"
    );
    Ok(())
}

#[tokio::test]
async fn missing_tenant_fails_before_any_request() {
    test_utils::do_setup();
    let transport = FakeTransport::returning(json!({}));
    let client = Client::with_collaborators(
        oauth_parameters(None),
        Url::parse(BASE_URL).unwrap(),
        transport.clone(),
        FakeHandshake::returning("T", "S"),
    );

    let error = client.get_invoices(None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Configuration);
    assert!(matches!(error, quickbooks_rs::Error::MissingTenantId { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn malformed_record_is_a_parse_error() {
    let transport = FakeTransport::returning(json!({
        "QueryResponse": {
            "Invoice": [{"Id": 1, "TxnDate": "15/01/2023"}]
        }
    }));
    let client = session_client(transport);

    let error = client.get_invoices(None).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Parse);
    assert!(error.to_string().contains("Invoice"));
    assert!(error.response_body().unwrap().contains("15/01/2023"));
}

#[tokio::test]
async fn raw_query_returns_the_payload() -> Result<()> {
    let payload = json!({"QueryResponse": {"Invoice": []}, "time": "now"});
    let client = session_client(FakeTransport::returning(payload.clone()));
    let request = quickbooks_rs::QueryRequest::new(quickbooks_rs::QueryObject::Invoice, None);
    assert_eq!(client.query(&request).await?, payload);
    Ok(())
}
