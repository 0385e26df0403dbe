//! smsprobe 프로비저닝 워크플로우
//!
//! 대상 네트워크마다 provider 테스트를 만들고, 배정된 번호로 연락처와 알림을 생성한 뒤
//! 생성된 테스트 id 목록을 식별자 저장소에 기록합니다.
//!
//! # 모듈 구조
//!
//! - [`orchestrator`]: 순회 루프와 `run_provisioning` 진입점
//! - [`template`]: 연락처/알림 요청 템플릿
//! - [`pacing`]: 쓰기 호출 간격 제한

pub mod orchestrator;
pub mod pacing;
pub mod template;

pub use orchestrator::{ProvisionSummary, Provisioner, run_provisioning};
pub use pacing::{FixedDelayPacer, Pacer};
pub use template::PayloadTemplates;
