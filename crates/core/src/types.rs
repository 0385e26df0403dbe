//! 도메인 타입: 두 워크플로우가 공유하는 데이터 구조
//!
//! 프로비저닝 단계의 레코드(`ProvisionedTest`, `Contact`, `NotificationRecord`)는
//! 한 번의 실행 동안만 유지되며, 테스트 식별자만 저장소에 기록됩니다.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SecretError;

/// 전달 실패 시 결과 필드에 채워지는 값
pub const NOT_APPLICABLE: &str = "N/A";

/// provider가 전달 성공을 보고할 때의 상태 값
pub const POSITIVE_STATUS: &str = "POSITIVE";

/// 전달 성공 상태의 정규화된 라벨
pub const DELIVERED_LABEL: &str = "DELIVERED";

/// 테스트 대상 모바일 네트워크
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTarget {
    /// Mobile Country Code
    pub mcc: String,
    /// Mobile Network Code
    pub mnc: String,
}

impl NetworkTarget {
    pub fn new(mcc: impl Into<String>, mnc: impl Into<String>) -> Self {
        Self {
            mcc: mcc.into(),
            mnc: mnc.into(),
        }
    }
}

impl fmt::Display for NetworkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.mcc, self.mnc)
    }
}

/// 국가 하나와 그 국가에서 테스트할 네트워크 목록
///
/// 설정된 순서 그대로 순회합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTargets {
    /// 소문자 ISO 국가 코드 (예: "ru")
    pub country: String,
    /// 테스트할 네트워크 (순서 유지)
    pub networks: Vec<NetworkTarget>,
}

/// provider가 테스트 생성 시 반환하는 레코드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTest {
    /// 저장소에 기록되는 영구 식별자
    pub test_id: String,
    /// 메시지 본문에 삽입되는 식별 텍스트
    pub test_id_text: String,
    /// 메시지를 받을 목적지 번호
    pub phone_number: String,
}

/// 메시징 플랫폼의 수신자 레코드. 삭제하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub contact_id: String,
}

/// 알림 전송 결과. 로그로만 남깁니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub notification_id: String,
}

/// provider 결과 조회 응답
///
/// 전달 관련 필드는 성공한 테스트에서만 채워집니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTestResult {
    pub id: String,
    pub test_status: String,
    pub country_name: String,
    pub provider_name: String,
    pub text_delivered: Option<String>,
    /// 초 단위 지연 시간 (provider가 보낸 숫자를 그대로 문자열화)
    pub receipt_delay: Option<String>,
    pub sender_delivered: Option<String>,
}

/// 식별자 하나에 대한 정규화된 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultProfile {
    pub id: String,
    pub country_name: String,
    pub provider_name: String,
    pub text_delivered: String,
    pub receipt_delay: String,
    pub test_status: String,
    pub received_from: String,
}

impl ResultProfile {
    /// 리포트 컬럼 이름으로 필드 값을 조회합니다.
    ///
    /// 알 수 없는 컬럼은 `None`을 반환하며, 렌더러는 이를 빈 문자열로 출력합니다.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "id" => &self.id,
            "countryName" => &self.country_name,
            "providerName" => &self.provider_name,
            "textDelivered" => &self.text_delivered,
            "receiptDelay" => &self.receipt_delay,
            "testStatus" => &self.test_status,
            "receivedFrom" => &self.received_from,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// 전달에 성공한 결과인지 확인합니다.
    pub fn is_delivered(&self) -> bool {
        self.test_status == DELIVERED_LABEL
    }
}

/// 시크릿 이름 -> 값 매핑
///
/// 호출마다 새로 조회하며 저장하지 않습니다. `Debug` 출력은 값을 가립니다.
#[derive(Clone, Default)]
pub struct CredentialBundle {
    secrets: HashMap<String, String>,
}

impl CredentialBundle {
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }

    /// 이름으로 시크릿을 조회합니다.
    pub fn get(&self, name: &str) -> Result<&str, SecretError> {
        self.secrets
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SecretError::Missing(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.secrets.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CredentialBundle")
            .field("names", &names)
            .finish_non_exhaustive()
    }
}

impl FromIterator<(String, String)> for CredentialBundle {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            secrets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivered_profile() -> ResultProfile {
        ResultProfile {
            id: "101".to_owned(),
            country_name: "Ukraine".to_owned(),
            provider_name: "Kyivstar".to_owned(),
            text_delivered: "ABC123 hello".to_owned(),
            receipt_delay: "7 seconds".to_owned(),
            test_status: DELIVERED_LABEL.to_owned(),
            received_from: "InfoSMS".to_owned(),
        }
    }

    #[test]
    fn profile_field_lookup_by_column_name() {
        let profile = delivered_profile();
        assert_eq!(profile.field("countryName"), Some("Ukraine"));
        assert_eq!(profile.field("receivedFrom"), Some("InfoSMS"));
        assert_eq!(profile.field("networkType"), None);
        assert!(profile.is_delivered());
    }

    #[test]
    fn network_target_display() {
        assert_eq!(NetworkTarget::new("250", "01").to_string(), "250-01");
    }

    #[test]
    fn credential_bundle_missing_key() {
        let bundle: CredentialBundle = [("app_id".to_owned(), "id-1".to_owned())]
            .into_iter()
            .collect();
        assert_eq!(bundle.get("app_id").unwrap(), "id-1");
        assert!(matches!(
            bundle.get("app_key"),
            Err(SecretError::Missing(name)) if name == "app_key"
        ));
    }

    #[test]
    fn credential_bundle_debug_hides_values() {
        let bundle: CredentialBundle = [("app_key".to_owned(), "super-secret".to_owned())]
            .into_iter()
            .collect();
        let rendered = format!("{bundle:?}");
        assert!(rendered.contains("app_key"));
        assert!(!rendered.contains("super-secret"));
    }
}
