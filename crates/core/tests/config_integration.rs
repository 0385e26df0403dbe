//! smsprobe.toml 통합 설정 테스트
//!
//! - smsprobe.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 파일 로딩 / 잘못된 형식 에러 테스트

use std::io::Write;

use serial_test::serial;

use smsprobe_core::config::ProbeConfig;
use smsprobe_core::error::{ConfigError, ProbeError};

// =============================================================================
// smsprobe.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_and_validates() {
    let content = include_str!("../../../smsprobe.toml.example");
    let config = ProbeConfig::parse(content).expect("example config should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_builtin_defaults() {
    let content = include_str!("../../../smsprobe.toml.example");
    let config = ProbeConfig::parse(content).expect("should parse");
    let defaults = ProbeConfig::default();

    assert_eq!(config.provisioning.targets, defaults.provisioning.targets);
    assert_eq!(
        config.provisioning.tests_per_network,
        defaults.provisioning.tests_per_network
    );
    assert_eq!(config.report.field_list, defaults.report.field_list);
    assert_eq!(config.messaging.message_body, defaults.messaging.message_body);
    assert_eq!(config.provider.base_url, defaults.provider.base_url);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_report_section_keeps_other_defaults() {
    let toml = r#"
[report]
sample_cap = 2
attach_csv = true
"#;
    let config = ProbeConfig::parse(toml).expect("should parse");
    assert_eq!(config.report.sample_cap, 2);
    assert!(config.report.attach_csv);
    // 나머지 필드는 기본값 유지
    assert!(config.report.results_in_email);
    assert_eq!(config.provisioning.targets.len(), 2);
}

#[test]
fn targets_override_replaces_default_list() {
    let toml = r#"
[[provisioning.targets]]
country = "kz"
networks = [{ mcc = "401", mnc = "02" }]
"#;
    let config = ProbeConfig::parse(toml).expect("should parse");
    assert_eq!(config.provisioning.targets.len(), 1);
    assert_eq!(config.provisioning.targets[0].country, "kz");
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
async fn from_file_loads_valid_config() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[general]\nlog_format = \"pretty\"").expect("write");

    let config = ProbeConfig::from_file(file.path()).await.expect("should load");
    assert_eq!(config.general.log_format, "pretty");
}

#[tokio::test]
async fn load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[store]\nbackend = \"dynamo\"").expect("write");

    let err = ProbeConfig::load(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        ProbeError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn from_file_only_parses() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[store]\nbackend = \"dynamo\"").expect("write");

    let config = ProbeConfig::from_file(file.path()).await.expect("should parse");
    assert_eq!(config.store.backend, "dynamo");
}

#[tokio::test]
#[serial]
async fn load_validates_after_env_overrides() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[report]\nemail_to = []").expect("write");

    // SAFETY: serial 테스트로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("SMSPROBE_REPORT_EMAIL_TO", "ops@example.com") };
    let result = ProbeConfig::load(file.path()).await;
    unsafe { std::env::remove_var("SMSPROBE_REPORT_EMAIL_TO") };

    let config = result.expect("env override should satisfy validation");
    assert_eq!(config.report.email_to, vec!["ops@example.com"]);
}

#[tokio::test]
#[serial]
async fn load_without_override_rejects_empty_recipients() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[report]\nemail_to = []").expect("write");

    let err = ProbeConfig::load(file.path()).await.unwrap_err();
    assert!(err.to_string().contains("report.email_to"));
}
