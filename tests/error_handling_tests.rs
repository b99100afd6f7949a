use miette::Diagnostic;
use serde_json::json;

use quickbooks_rs::error::{Error, ErrorKind, FaultResponse};

#[test]
fn test_validation_fault_deserialization() {
    let fault_json = json!({
        "Fault": {
            "Error": [{
                "Message": "Invalid Reference Id",
                "Detail": "Invalid Reference Id : Customer assigned to this transaction has been deleted",
                "code": "2500",
                "element": "CustomerRef"
            }],
            "type": "ValidationFault"
        },
        "time": "2023-02-01T10:00:00.000-08:00"
    });

    let result: Result<FaultResponse, _> = serde_json::from_value(fault_json);
    assert!(
        result.is_ok(),
        "Failed to deserialize ValidationFault: {:?}",
        result.err()
    );

    let response = result.unwrap();
    assert_eq!(response.fault_type(), "ValidationFault");
    assert_eq!(response.fault.errors.len(), 1);
    assert_eq!(response.fault.errors[0].element.as_deref(), Some("CustomerRef"));
    assert_eq!(response.time.as_deref(), Some("2023-02-01T10:00:00.000-08:00"));
}

#[test]
fn test_lowercase_fault_keys() {
    // Some endpoints answer with camel-cased keys
    let fault_json = json!({
        "fault": {
            "error": [{"Message": "message=AuthenticationFailed", "code": "3200"}],
            "type": "AUTHENTICATION"
        }
    });

    let response: FaultResponse = serde_json::from_value(fault_json).unwrap();
    assert_eq!(response.fault_type(), "AUTHENTICATION");
    assert_eq!(response.fault.errors[0].code.as_deref(), Some("3200"));
}

#[test]
fn test_fault_without_type() {
    let response: FaultResponse =
        serde_json::from_value(json!({"Fault": {"Error": []}})).unwrap();
    assert_eq!(response.fault_type(), "Unknown");
    assert_eq!(response.to_string(), "QuickBooks Unknown");
}

#[test]
fn test_fault_display_formatting() {
    let response: FaultResponse = serde_json::from_value(json!({
        "Fault": {
            "Error": [
                {"Message": "Error parsing query", "Detail": "QueryParserError", "code": "4000"},
                {"Message": "Second problem"}
            ],
            "type": "ValidationFault"
        }
    }))
    .unwrap();

    assert_eq!(
        response.to_string(),
        "QuickBooks ValidationFault; Error parsing query (code 4000): QueryParserError; Second problem"
    );
}

#[test]
fn test_error_kinds_and_diagnostic_codes() {
    let cases = vec![
        (
            Error::MissingConfiguration {
                variable: "QUICKBOOKS_CONSUMER_KEY".to_string(),
            },
            ErrorKind::Configuration,
            "quickbooks_rs::missing_configuration",
        ),
        (
            Error::InvalidEndpoint { url: String::new() },
            ErrorKind::Configuration,
            "quickbooks_rs::invalid_endpoint",
        ),
        (
            Error::AuthorizationTimeout {
                timeout: std::time::Duration::from_secs(300),
            },
            ErrorKind::Authorization,
            "quickbooks_rs::authorization_timeout",
        ),
        (
            Error::CallbackClosed,
            ErrorKind::Authorization,
            "quickbooks_rs::callback_closed",
        ),
    ];

    for (error, kind, code) in cases {
        assert_eq!(error.kind(), kind, "wrong kind for {error:?}");
        assert_eq!(
            error.code().map(|c| c.to_string()).as_deref(),
            Some(code),
            "wrong code for {error:?}"
        );
    }
}

#[test]
fn test_missing_configuration_help() {
    let error = Error::MissingConfiguration {
        variable: "QUICKBOOKS_CONSUMER_SECRET".to_string(),
    };
    let help = error.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("QUICKBOOKS_CONSUMER_SECRET"));
    assert!(error.span_trace().is_none());
    assert!(error.url().is_none());
}

#[test]
fn test_deserialization_error_context() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = Error::DeserializationError {
        source,
        entity_type: "Report".to_string(),
        response_body: Some("{".to_string()),
        span_trace: quickbooks_rs::SpanTrace::capture(),
    };
    assert_eq!(error.kind(), ErrorKind::Parse);
    assert!(error.to_string().starts_with("error decoding Report"));
    assert_eq!(error.response_body(), Some("{"));
    assert!(error.span_trace().is_some());
}
