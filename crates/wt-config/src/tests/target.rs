use crate::HarnessConfig;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};

#[test]
fn given_default_target_when_base_url_then_loopback_on_8080() {
    // Given
    let config = HarnessConfig::default();

    // When
    let url = config.target.base_url();

    // Then
    assert_that!(url.as_str(), eq("http://127.0.0.1:8080"));
}

#[test]
fn given_ipv6_loopback_when_base_url_then_bracketed() {
    // Given
    let config = HarnessConfig::from_toml_str("[target]\nhost = \"::1\"\nport = 9000\n").unwrap();

    // When
    let url = config.target.base_url();

    // Then
    assert_that!(url.as_str(), eq("http://[::1]:9000"));
}

#[test]
fn given_localhost_when_validate_then_ok() {
    // Given
    let config = HarnessConfig::from_toml_str("[target]\nhost = \"localhost\"\n").unwrap();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
fn given_remote_host_when_validate_then_error() {
    // Given
    let config = HarnessConfig::from_toml_str("[target]\nhost = \"10.0.0.8\"\n").unwrap();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_port_zero_when_validate_then_error() {
    // Given
    let config = HarnessConfig::from_toml_str("[target]\nport = 0\n").unwrap();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_empty_content_root_when_validate_then_error() {
    // Given
    let config = HarnessConfig::from_toml_str("[target]\ncontent_root = \"\"\n").unwrap();

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}
