//! 외부 협력자 trait: 워크플로우가 소비하는 인터페이스 정의
//!
//! 프로덕션 구현은 `smsprobe-clients`, `smsprobe-store`, `smsprobe-reporter`에 있으며
//! 테스트는 각 크레이트에서 mock 구현을 사용합니다.

use std::future::Future;

use crate::error::ProbeError;
use crate::payload::{ContactPayload, NotificationPayload};
use crate::types::{Contact, CredentialBundle, NotificationRecord, ProvisionedTest, RawTestResult};

/// 호출마다 자격 증명 번들을 제공하는 trait
pub trait SecretResolver: Send + Sync {
    /// 시크릿 번들을 새로 조회합니다.
    fn resolve(&self) -> impl Future<Output = Result<CredentialBundle, ProbeError>> + Send;
}

/// SMS 테스트 provider API
///
/// 모든 호출은 bearer 토큰으로 인증합니다.
pub trait TestProvider: Send + Sync {
    /// app id/key로 bearer 토큰을 발급받습니다.
    fn obtain_token(
        &self,
        app_id: &str,
        app_key: &str,
    ) -> impl Future<Output = Result<String, ProbeError>> + Send;

    /// 네트워크 하나에 대한 테스트를 생성합니다.
    ///
    /// provider는 목록을 반환하며, 비어 있으면 malformed 응답으로 처리해야 합니다.
    fn create_test(
        &self,
        token: &str,
        mcc: &str,
        mnc: &str,
        ttl_secs: u64,
    ) -> impl Future<Output = Result<Vec<ProvisionedTest>, ProbeError>> + Send;

    /// 테스트 결과를 조회합니다.
    fn get_result(
        &self,
        token: &str,
        test_id: &str,
    ) -> impl Future<Output = Result<RawTestResult, ProbeError>> + Send;
}

/// 메시징 플랫폼 API (API 키 인증)
pub trait MessagingPlatform: Send + Sync {
    /// 연락처를 생성하고 id를 반환합니다.
    fn create_contact(
        &self,
        payload: &ContactPayload,
    ) -> impl Future<Output = Result<Contact, ProbeError>> + Send;

    /// 알림을 전송하고 id를 반환합니다.
    fn create_notification(
        &self,
        payload: &NotificationPayload,
    ) -> impl Future<Output = Result<NotificationRecord, ProbeError>> + Send;
}
