use super::*;

#[test]
fn test_credentials_anonymous() {
    let creds = Credentials::anonymous();
    assert_eq!(creds, Credentials::Anonymous);
    assert!(creds.is_anonymous());
    assert_eq!(creds.to_header_value(), None);
}

#[test]
fn test_credentials_basic() {
    let creds = Credentials::basic("testuser", "testpass");
    match &creds {
        Credentials::Basic { username, password } => {
            assert_eq!(username, "testuser");
            assert_eq!(password, "testpass");
        }
        _ => panic!("Expected Basic credentials"),
    }

    // base64("testuser:testpass")
    assert_eq!(
        creds.to_header_value().unwrap(),
        "Basic dGVzdHVzZXI6dGVzdHBhc3M="
    );
}

#[test]
fn test_from_parts_both_empty_is_anonymous() {
    assert!(Credentials::from_parts("", "").is_anonymous());
}

#[test]
fn test_from_parts_password_only_is_basic() {
    let creds = Credentials::from_parts("", "secret");
    assert_eq!(creds, Credentials::basic("", "secret"));
    // base64(":secret")
    assert_eq!(creds.to_header_value().unwrap(), "Basic OnNlY3JldA==");
}

#[test]
fn test_from_parts_username_only_is_basic() {
    let creds = Credentials::from_parts("robot", "");
    assert!(!creds.is_anonymous());
    // base64("robot:")
    assert_eq!(creds.to_header_value().unwrap(), "Basic cm9ib3Q6");
}
