//! smsprobe 공통 크레이트
//!
//! 두 워크플로우(테스트 프로비저닝, 결과 수집/리포트)가 공유하는
//! 설정, 에러, 도메인 타입, 외부 협력자 trait을 정의합니다.

pub mod config;
pub mod error;
pub mod metrics;
pub mod payload;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{
    ConfigError, MailError, ProbeError, SecretError, StoreError, TransportError, UpstreamError,
};

// 설정
pub use config::ProbeConfig;

// 외부 협력자 trait
pub use pipeline::{MessagingPlatform, SecretResolver, TestProvider};

// 도메인 타입
pub use types::{
    Contact, CountryTargets, CredentialBundle, NetworkTarget, NotificationRecord,
    ProvisionedTest, RawTestResult, ResultProfile,
};
