//! smsprobe 결과 리포트 워크플로우
//!
//! 식별자 저장소의 테스트 id 목록을 읽어 provider 결과를 조회하고,
//! CSV/HTML 리포트로 렌더링한 뒤 메일로 발송합니다.
//!
//! # 모듈 구조
//!
//! - [`collector`]: 결과 조회 및 정규화
//! - [`render`]: CSV, HTML, plain text 렌더링
//! - [`mail`]: 메시지 조립과 전송 (`SmtpMailer`, `LogMailer`)
//! - [`workflow`]: `run_report` 진입점

pub mod collector;
pub mod mail;
pub mod render;
pub mod workflow;

pub use collector::{collect, profile_from_raw};
pub use mail::{LogMailer, MailTransport, Mailer, ReportEmail, SmtpMailer};
pub use render::{RenderedReport, ReportRow, render_csv, render_report};
pub use workflow::{ReportSummary, run_report};
