//! Credential file loading against real files on disk.

use std::io::Write;

use hours::{Credentials, HoursError};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_a_complete_config() {
    let file = write_config(
        r#"{
            "url": "https://portal.example.com/irj/portal",
            "username": "P000123",
            "password": "hunter2",
            "proxy_url": "http://wpad.example.com/wpad.dat"
        }"#,
    );

    let credentials = Credentials::load(file.path()).unwrap();
    assert_eq!(credentials.url, "https://portal.example.com/irj/portal");
    assert_eq!(credentials.username, "P000123");
    assert_eq!(credentials.proxy_url, "http://wpad.example.com/wpad.dat");
}

#[test]
fn missing_file_is_a_configuration_error() {
    let err = Credentials::load(std::path::Path::new("/nonexistent/hours.json")).unwrap_err();
    assert!(matches!(err, HoursError::Configuration(_)), "{err}");
}

#[test]
fn absent_required_key_is_a_configuration_error() {
    let file = write_config(
        r#"{
            "url": "https://portal.example.com",
            "username": "P000123",
            "password": "hunter2"
        }"#,
    );

    let err = Credentials::load(file.path()).unwrap_err();
    match err {
        HoursError::Configuration(msg) => assert!(msg.contains("proxy_url"), "{msg}"),
        other => panic!("expected configuration error, got: {other}"),
    }
}

#[test]
fn malformed_json_is_a_configuration_error() {
    let file = write_config("url = https://portal.example.com");
    let err = Credentials::load(file.path()).unwrap_err();
    assert!(matches!(err, HoursError::Configuration(_)), "{err}");
}

#[test]
fn unknown_keys_are_tolerated() {
    let file = write_config(
        r#"{
            "url": "https://portal.example.com",
            "username": "P000123",
            "password": "hunter2",
            "proxy_url": "http://wpad.example.com/wpad.dat",
            "comment": "weekly hours"
        }"#,
    );

    assert!(Credentials::load(file.path()).is_ok());
}
