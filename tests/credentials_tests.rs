//! Credential resolution tests

use shipit::config::credentials::resolve_credentials;
use shipit::error::{CliError, ErrorKind};
use shipit::system::MockSystem;

const HOME: &str = "/home/user";
const CREDENTIALS: &str = "/home/user/.shipit/credentials";

fn kind_of(err: &anyhow::Error) -> ErrorKind {
    err.downcast_ref::<CliError>().unwrap().kind()
}

#[tokio::test]
async fn test_json_credentials_file() {
    let system = MockSystem::new().with_home_dir(HOME).with_file(
        CREDENTIALS,
        br#"{"userId": "user-42", "secretKey": "s3cret"}"#,
    );

    let credentials = resolve_credentials(&system).await.unwrap();
    assert_eq!(credentials.user_id, "user-42");
    assert_eq!(credentials.secret_key, "s3cret");
}

#[tokio::test]
async fn test_yaml_credentials_file() {
    let system = MockSystem::new()
        .with_home_dir(HOME)
        .with_file(CREDENTIALS, b"userId: user-42\nsecretKey: s3cret\n");

    let credentials = resolve_credentials(&system).await.unwrap();
    assert_eq!(credentials.user_id, "user-42");
}

#[tokio::test]
async fn test_missing_file_asks_for_login() {
    let system = MockSystem::new().with_home_dir(HOME);

    let err = resolve_credentials(&system).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::Configuration);
    assert!(err.to_string().contains("No credentials file"));
    assert!(err.to_string().contains("shipit login"));
}

#[tokio::test]
async fn test_unparseable_file_is_a_format_error() {
    let system = MockSystem::new()
        .with_home_dir(HOME)
        .with_file(CREDENTIALS, b"{ userId: [unterminated");

    let err = resolve_credentials(&system).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::Format);
    assert!(err.to_string().contains("Could not parse credentials file"));
}

#[tokio::test]
async fn test_non_utf8_file_is_a_format_error() {
    let system = MockSystem::new()
        .with_home_dir(HOME)
        .with_file(CREDENTIALS, b"\xff\xfe{");

    let err = resolve_credentials(&system).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::Format);
    assert!(err.to_string().contains("Could not parse credentials file"));
    assert!(err.to_string().contains("re-run `shipit login`"));
}

#[tokio::test]
async fn test_empty_file_is_a_format_error() {
    for content in [&b""[..], &b"  \n"[..]] {
        let system = MockSystem::new()
            .with_home_dir(HOME)
            .with_file(CREDENTIALS, content);

        let err = resolve_credentials(&system).await.unwrap_err();
        assert_eq!(kind_of(&err), ErrorKind::Format);
        assert!(err.to_string().contains("Could not parse credentials file"));
    }
}

#[tokio::test]
async fn test_missing_secret_key_is_a_configuration_error() {
    let system = MockSystem::new()
        .with_home_dir(HOME)
        .with_file(CREDENTIALS, br#"{"userId": "user-42"}"#);

    let err = resolve_credentials(&system).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::Configuration);
    assert!(err.to_string().contains("Missing information"));
    assert!(err.to_string().contains("re-run `shipit login`"));
}

#[tokio::test]
async fn test_empty_user_id_is_a_configuration_error() {
    let system = MockSystem::new()
        .with_home_dir(HOME)
        .with_file(CREDENTIALS, br#"{"userId": "", "secretKey": "s3cret"}"#);

    let err = resolve_credentials(&system).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_unknown_home_directory() {
    let system = MockSystem::new();

    let err = resolve_credentials(&system).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::Configuration);
    assert!(err.to_string().contains("home directory"));
}
