use super::*;
use crate::auth::Credentials;
use crate::transport::{ClientConfig, HttpTransport, new_request};
use mockito::Matcher;
use reqwest::Method;

fn transport_for(registry_url: &str, creds: Credentials) -> BasicAuthTransport<HttpTransport> {
    let config = Arc::new(TransportConfig::new(registry_url, creds).unwrap());
    BasicAuthTransport::new(HttpTransport::new(&ClientConfig::default()).unwrap(), config)
}

#[test]
fn test_attaches_basic_auth_under_registry_url() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v2/acme/widget/manifests/1.0.0")
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .create();

    let transport = transport_for(&server.url(), Credentials::basic("user", "pass"));
    let request = new_request(
        Method::GET,
        &format!("{}/v2/acme/widget/manifests/1.0.0", server.url()),
    )
    .unwrap();
    let response = transport.round_trip(request).unwrap();

    mock.assert();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[test]
fn test_leaves_other_hosts_untouched() {
    let registry = mockito::Server::new();
    let mut auth_server = mockito::Server::new();
    let mock = auth_server
        .mock("GET", "/token")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .create();

    let transport = transport_for(&registry.url(), Credentials::basic("user", "pass"));
    let request = new_request(Method::GET, &format!("{}/token", auth_server.url())).unwrap();
    let response = transport.round_trip(request).unwrap();

    mock.assert();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[test]
fn test_anonymous_sends_no_authorization() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v2/")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .create();

    let transport = transport_for(&server.url(), Credentials::Anonymous);
    let request = new_request(Method::GET, &format!("{}/v2/", server.url())).unwrap();
    transport.round_trip(request).unwrap();

    mock.assert();
}

#[test]
fn test_username_only_still_sends_basic() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v2/")
        .match_header("authorization", "Basic cm9ib3Q6")
        .with_status(200)
        .create();

    let transport = transport_for(&server.url(), Credentials::from_parts("robot", ""));
    let request = new_request(Method::GET, &format!("{}/v2/", server.url())).unwrap();
    transport.round_trip(request).unwrap();

    mock.assert();
}

#[test]
fn test_error_statuses_pass_through_verbatim() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("www-authenticate", "Basic realm=\"registry\"")
        .create();

    let transport = transport_for(&server.url(), Credentials::basic("user", "wrong"));
    let request = new_request(Method::GET, &format!("{}/v2/", server.url())).unwrap();
    let response = transport.round_trip(request).unwrap();

    mock.assert();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Basic realm=\"registry\""
    );
}
