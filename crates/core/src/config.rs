//! 설정 관리: smsprobe.toml 파싱 및 런타임 설정
//!
//! [`ProbeConfig`]는 두 워크플로우의 모든 튜닝 값을 담는 최상위 구조체입니다.
//! 각 섹션의 기본값은 운영 배포에서 사용하던 상수와 동일합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SMSPROBE_REPORT_SAMPLE_CAP=10` 형식)
//! 3. 설정 파일 (`smsprobe.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), smsprobe_core::error::ProbeError> {
//! use smsprobe_core::config::ProbeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ProbeConfig::load("smsprobe.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ProbeConfig::parse("[report]\nsample_cap = 25")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ProbeError};
use crate::types::{CountryTargets, NetworkTarget};

/// smsprobe 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 시크릿 소스 설정
    #[serde(default)]
    pub secrets: SecretsConfig,
    /// 테스트 provider API 설정
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 메시징 플랫폼 설정
    #[serde(default)]
    pub messaging: MessagingConfig,
    /// 프로비저닝 대상 및 반복 설정
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    /// 식별자 저장소 설정
    #[serde(default)]
    pub store: StoreConfig,
    /// 리포트 렌더링/발송 설정
    #[serde(default)]
    pub report: ReportConfig,
}

impl ProbeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값 + 환경변수 오버라이드로 설정을 만듭니다.
    pub fn from_env() -> Result<Self, ProbeError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 읽어 파싱만 합니다 (환경변수 오버라이드, 검증 없음).
    ///
    /// 검증은 오버라이드가 모두 적용된 뒤 [`ProbeConfig::load`]에서 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProbeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ProbeError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ProbeError> {
        toml::from_str(toml_str).map_err(|e| {
            ProbeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SMSPROBE_{SECTION}_{FIELD}`
    /// 대상 네트워크 목록은 구조가 있어 설정 파일로만 지정합니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "SMSPROBE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SMSPROBE_GENERAL_LOG_FORMAT");

        // Secrets
        override_string(&mut self.secrets.source, "SMSPROBE_SECRETS_SOURCE");
        override_string(&mut self.secrets.env_var, "SMSPROBE_SECRETS_ENV_VAR");
        override_string(&mut self.secrets.path, "SMSPROBE_SECRETS_PATH");

        // Provider
        override_string(&mut self.provider.base_url, "SMSPROBE_PROVIDER_BASE_URL");
        override_u64(
            &mut self.provider.test_ttl_secs,
            "SMSPROBE_PROVIDER_TEST_TTL_SECS",
        );
        override_u64(
            &mut self.provider.request_timeout_secs,
            "SMSPROBE_PROVIDER_REQUEST_TIMEOUT_SECS",
        );

        // Messaging
        override_string(&mut self.messaging.endpoint, "SMSPROBE_MESSAGING_ENDPOINT");
        override_string(&mut self.messaging.org_id, "SMSPROBE_MESSAGING_ORG_ID");
        override_string(
            &mut self.messaging.record_type_id,
            "SMSPROBE_MESSAGING_RECORD_TYPE_ID",
        );
        override_string(&mut self.messaging.account_id, "SMSPROBE_MESSAGING_ACCOUNT_ID");
        override_string(
            &mut self.messaging.delivery_id,
            "SMSPROBE_MESSAGING_DELIVERY_ID",
        );
        override_string(&mut self.messaging.language, "SMSPROBE_MESSAGING_LANGUAGE");

        // Provisioning
        override_usize(
            &mut self.provisioning.tests_per_network,
            "SMSPROBE_PROVISIONING_TESTS_PER_NETWORK",
        );
        override_u64(
            &mut self.provisioning.pacing_delay_ms,
            "SMSPROBE_PROVISIONING_PACING_DELAY_MS",
        );

        // Store
        override_string(&mut self.store.backend, "SMSPROBE_STORE_BACKEND");
        override_string(&mut self.store.path, "SMSPROBE_STORE_PATH");

        // Report
        override_string(&mut self.report.report_name, "SMSPROBE_REPORT_REPORT_NAME");
        override_csv(&mut self.report.field_list, "SMSPROBE_REPORT_FIELD_LIST");
        override_bool(
            &mut self.report.results_in_email,
            "SMSPROBE_REPORT_RESULTS_IN_EMAIL",
        );
        override_bool(&mut self.report.attach_csv, "SMSPROBE_REPORT_ATTACH_CSV");
        override_usize(&mut self.report.sample_cap, "SMSPROBE_REPORT_SAMPLE_CAP");
        override_bool(&mut self.report.testing_mode, "SMSPROBE_REPORT_TESTING_MODE");
        override_string(&mut self.report.smtp_server, "SMSPROBE_REPORT_SMTP_SERVER");
        override_u16(&mut self.report.smtp_port, "SMSPROBE_REPORT_SMTP_PORT");
        override_string(&mut self.report.email_from, "SMSPROBE_REPORT_EMAIL_FROM");
        override_csv(&mut self.report.email_to, "SMSPROBE_REPORT_EMAIL_TO");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ProbeError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        let valid_sources = ["env", "file"];
        if !valid_sources.contains(&self.secrets.source.as_str()) {
            return Err(invalid(
                "secrets.source",
                format!("must be one of: {}", valid_sources.join(", ")),
            ));
        }

        for (field, url) in [
            ("provider.base_url", &self.provider.base_url),
            ("messaging.endpoint", &self.messaging.endpoint),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(field, "must be an http(s) URL".to_owned()));
            }
        }

        if self.provider.test_ttl_secs == 0 {
            return Err(invalid(
                "provider.test_ttl_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.provisioning.targets.is_empty() {
            return Err(invalid(
                "provisioning.targets",
                "at least one target country required".to_owned(),
            ));
        }

        for target in &self.provisioning.targets {
            if target.country.is_empty() {
                return Err(invalid(
                    "provisioning.targets",
                    "country code must not be empty".to_owned(),
                ));
            }
            if target.networks.is_empty() {
                return Err(invalid(
                    "provisioning.targets",
                    format!("country '{}' has no networks", target.country),
                ));
            }
        }

        if self.provisioning.tests_per_network == 0 {
            return Err(invalid(
                "provisioning.tests_per_network",
                "must be at least 1".to_owned(),
            ));
        }

        let valid_backends = ["memory", "file"];
        if !valid_backends.contains(&self.store.backend.as_str()) {
            return Err(invalid(
                "store.backend",
                format!("must be one of: {}", valid_backends.join(", ")),
            ));
        }

        if self.store.backend == "file" && self.store.path.is_empty() {
            return Err(invalid(
                "store.path",
                "path must not be empty for the file backend".to_owned(),
            ));
        }

        if self.report.field_list.is_empty() {
            return Err(invalid(
                "report.field_list",
                "at least one report column required".to_owned(),
            ));
        }

        if !self.report.testing_mode && self.report.email_to.is_empty() {
            return Err(invalid(
                "report.email_to",
                "at least one recipient required unless testing_mode is set".to_owned(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> ProbeError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 시크릿 소스 설정
///
/// 시크릿은 문자열 값만 가진 JSON 객체입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// 시크릿 소스 (env, file)
    pub source: String,
    /// `env` 소스에서 JSON을 읽을 환경변수
    pub env_var: String,
    /// `file` 소스의 JSON 파일 경로
    pub path: String,
    /// provider app id 시크릿 이름
    pub app_id_name: String,
    /// provider app key 시크릿 이름
    pub app_key_name: String,
    /// 메시징 플랫폼 API 키 시크릿 이름
    pub messaging_api_key_name: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            source: "env".to_owned(),
            env_var: "SMSPROBE_SECRET_JSON".to_owned(),
            path: "/etc/smsprobe/secrets.json".to_owned(),
            app_id_name: "app_id".to_owned(),
            app_key_name: "app_key".to_owned(),
            messaging_api_key_name: "messaging_api_key".to_owned(),
        }
    }
}

/// 테스트 provider 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API 기본 URL
    pub base_url: String,
    /// 생성하는 테스트의 수명 (초)
    pub test_ttl_secs: u64,
    /// HTTP 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.telqtele.com".to_owned(),
            test_ttl_secs: 3600,
            request_timeout_secs: 30,
        }
    }
}

/// 메시징 플랫폼 설정
///
/// 연락처/알림 템플릿에 들어가는 고정 메타데이터를 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingConfig {
    /// 환경 이름 (로그용)
    pub environment_name: String,
    /// REST API 기본 URL
    pub endpoint: String,
    pub org_id: String,
    pub record_type_id: String,
    pub account_id: String,
    /// 전달 경로 레코드 id
    pub delivery_id: String,
    /// SMS 전달 경로 id
    pub path_id: String,
    /// 생성하는 연락처의 이름
    pub contact_first_name: String,
    pub timezone_id: String,
    /// 알림 언어 태그
    pub language: String,
    /// 테스트 식별 텍스트 뒤에 붙는 메시지 본문
    pub message_body: String,
    /// HTTP 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            environment_name: "Prod US".to_owned(),
            endpoint: "https://api.example.net".to_owned(),
            org_id: String::new(),
            record_type_id: String::new(),
            account_id: String::new(),
            delivery_id: String::new(),
            path_id: "241901148045324".to_owned(),
            contact_first_name: "TelQ Test".to_owned(),
            timezone_id: "America/New_York".to_owned(),
            language: "en_US".to_owned(),
            message_body: " You may have to leave your home quickly to stay safe.".to_owned(),
            request_timeout_secs: 30,
        }
    }
}

/// 프로비저닝 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// 대상 국가 (설정 순서대로 순회)
    pub targets: Vec<CountryTargets>,
    /// 네트워크당 반복 횟수
    pub tests_per_network: usize,
    /// 쓰기 호출 사이의 고정 대기 시간 (밀리초)
    pub pacing_delay_ms: u64,
}

impl ProvisioningConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// 한 번의 실행이 생성할 테스트 수
    pub fn expected_test_count(&self) -> usize {
        self.targets
            .iter()
            .map(|t| t.networks.len() * self.tests_per_network)
            .sum()
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        let country = |code: &str, networks: &[(&str, &str)]| CountryTargets {
            country: code.to_owned(),
            networks: networks
                .iter()
                .map(|(mcc, mnc)| NetworkTarget::new(*mcc, *mnc))
                .collect(),
        };
        Self {
            targets: vec![
                country(
                    "ru",
                    &[("250", "20"), ("250", "99"), ("250", "02"), ("250", "01")],
                ),
                country("ua", &[("255", "01"), ("255", "06"), ("255", "03")]),
            ],
            tests_per_network: 3,
            pacing_delay_ms: 1000,
        }
    }
}

/// 식별자 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 백엔드 종류 (memory, file)
    pub backend: String,
    /// `file` 백엔드의 JSON 문서 경로
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_owned(),
            path: "/var/lib/smsprobe/identifiers.json".to_owned(),
        }
    }
}

/// 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 리포트 이름 (메일 제목, 본문 머리말)
    pub report_name: String,
    /// 리포트 컬럼 순서
    pub field_list: Vec<String>,
    /// 메일 본문에 결과 표 포함 여부
    pub results_in_email: bool,
    /// CSV 첨부 여부
    pub attach_csv: bool,
    /// 본문 표의 최대 행 수. 0이면 전체
    pub sample_cap: usize,
    /// true면 메일을 보내지 않고 본문을 로그로 출력
    pub testing_mode: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub email_from: String,
    pub email_to: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_name: "Ukraine and Russia TelQ Testing Report".to_owned(),
            field_list: [
                "id",
                "countryName",
                "providerName",
                "textDelivered",
                "receivedFrom",
                "testStatus",
                "receiptDelay",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
            results_in_email: true,
            attach_csv: false,
            sample_cap: 0,
            testing_mode: false,
            smtp_server: "localhost".to_owned(),
            smtp_port: 25,
            email_from: "smsprobe@localhost".to_owned(),
            email_to: vec!["sms-reports@localhost".to_owned()],
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
