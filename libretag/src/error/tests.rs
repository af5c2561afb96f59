use super::*;
use std::error::Error;

#[test]
fn test_network_error_connection_refused() {
    let err = RetagError::Network {
        message: "connection refused".to_string(),
        source: None,
    };

    assert!(matches!(err, RetagError::Network { .. }));
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_http_error_display_matches_status_and_quoted_url() {
    let err = RetagError::http(
        "404 Not Found",
        "http://localhost:5000/v2/acme/widget/manifests/1.0.0",
    );

    assert_eq!(
        err.to_string(),
        "HTTP 404 Not Found when accessing \"http://localhost:5000/v2/acme/widget/manifests/1.0.0\""
    );
}

#[test]
fn test_http_error_fields() {
    let err = RetagError::http("500 Internal Server Error", "http://r/v2/a/manifests/b");

    match err {
        RetagError::Http { status, url } => {
            assert_eq!(status, "500 Internal Server Error");
            assert_eq!(url, "http://r/v2/a/manifests/b");
        }
        _ => panic!("Expected Http error"),
    }
}

#[test]
fn test_http_error_has_no_source() {
    let err = RetagError::http("401 Unauthorized", "http://r/v2/");
    assert!(err.source().is_none());
}

#[test]
fn test_token_decode_is_distinct_from_http() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err = RetagError::token_decode_with_source("token body is not JSON", json_err);

    assert!(matches!(err, RetagError::TokenDecode { .. }));
    assert!(!matches!(err, RetagError::Http { .. }));
    assert!(err.source().is_some());
    assert!(err.to_string().starts_with("Invalid token response"));
}

#[test]
fn test_validation_helper_constructor() {
    let err = RetagError::validation("Registry URL cannot be empty");
    assert!(matches!(err, RetagError::Validation { .. }));
    assert!(err.to_string().contains("Registry URL cannot be empty"));
}

#[test]
fn test_validation_with_source_helper_constructor() {
    let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "invalid data");
    let err = RetagError::validation_with_source("invalid realm", io_err);
    assert!(matches!(err, RetagError::Validation { .. }));
    assert!(err.source().is_some());
}

#[test]
fn test_network_with_source_helper_constructor() {
    let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
    let err = RetagError::network_with_source("failed to connect", io_err);
    assert!(matches!(err, RetagError::Network { .. }));
    assert!(err.source().unwrap().to_string().contains("connection refused"));
}

#[test]
fn test_error_implements_error_trait() {
    let err = RetagError::network("test error");
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RetagError>();
}
