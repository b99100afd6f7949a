use serial_test::serial;

use quickbooks_rs::{Environment, Error, OauthParameters, oauth::INTUIT_REQUEST_TOKEN_URL};

const VARIABLES: [&str; 5] = [
    "QUICKBOOKS_CONSUMER_KEY",
    "QUICKBOOKS_CONSUMER_SECRET",
    "QUICKBOOKS_CALLBACK_URL",
    "QUICKBOOKS_ENVIRONMENT",
    "QUICKBOOKS_BASE_URL",
];

/// Replaces the QuickBooks variables of the process environment. Callers are `#[serial]`.
fn set_env(values: &[(&str, &str)]) {
    for variable in VARIABLES {
        // SAFETY: every test touching the environment runs serially
        unsafe { std::env::remove_var(variable) };
    }
    for (variable, value) in values {
        unsafe { std::env::set_var(variable, value) };
    }
}

#[test]
#[serial]
fn oauth_parameters_from_env() {
    set_env(&[
        ("QUICKBOOKS_CONSUMER_KEY", "key"),
        ("QUICKBOOKS_CONSUMER_SECRET", "secret"),
        ("QUICKBOOKS_CALLBACK_URL", "https://app.example.com/cb"),
    ]);
    let parameters = OauthParameters::from_env().unwrap();
    assert_eq!(parameters.consumer_key, "key");
    assert_eq!(parameters.consumer_secret, "secret");
    assert_eq!(parameters.callback_url.as_deref(), Some("https://app.example.com/cb"));
    assert_eq!(parameters.request_token_url, INTUIT_REQUEST_TOKEN_URL);

    set_env(&[
        ("QUICKBOOKS_CONSUMER_KEY", "key"),
        ("QUICKBOOKS_CONSUMER_SECRET", "secret"),
    ]);
    assert!(OauthParameters::from_env().unwrap().callback_url.is_none());
}

#[test]
#[serial]
fn missing_consumer_credentials() {
    set_env(&[("QUICKBOOKS_CONSUMER_KEY", "key")]);
    let error = OauthParameters::from_env().unwrap_err();
    assert!(error.is_configuration());
    assert!(matches!(
        error,
        Error::MissingConfiguration { ref variable } if variable == "QUICKBOOKS_CONSUMER_SECRET"
    ));

    set_env(&[]);
    assert!(matches!(
        OauthParameters::from_env(),
        Err(Error::MissingConfiguration { ref variable }) if variable == "QUICKBOOKS_CONSUMER_KEY"
    ));
}

#[test]
#[serial]
fn environment_defaults_to_sandbox() {
    set_env(&[]);
    assert_eq!(Environment::from_env().unwrap(), Environment::Sandbox);

    set_env(&[("QUICKBOOKS_ENVIRONMENT", "sandbox")]);
    assert_eq!(Environment::from_env().unwrap(), Environment::Sandbox);

    set_env(&[("QUICKBOOKS_ENVIRONMENT", "production")]);
    assert_eq!(Environment::from_env().unwrap(), Environment::Production);
}

#[test]
#[serial]
fn base_url_overrides_the_environment() {
    set_env(&[
        ("QUICKBOOKS_ENVIRONMENT", "production"),
        ("QUICKBOOKS_BASE_URL", "http://127.0.0.1:8080/v3/company/"),
    ]);
    let environment = Environment::from_env().unwrap();
    assert_eq!(
        environment,
        Environment::Custom("http://127.0.0.1:8080/v3/company/".to_string())
    );
    assert_eq!(environment.base_url().unwrap().port(), Some(8080));
}

#[test]
#[serial]
fn unknown_environment_names_the_value() {
    set_env(&[("QUICKBOOKS_ENVIRONMENT", "staging")]);
    let error = Environment::from_env().unwrap_err();
    assert!(error.is_configuration());
    assert!(matches!(error, Error::InvalidConfiguration { ref value, .. } if value == "staging"));
    let message = error.to_string();
    assert!(message.contains("\"staging\""));
    assert!(message.contains("production, sandbox"));
}
