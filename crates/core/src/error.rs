//! 에러 타입: 도메인별 에러 정의
//!
//! 모든 워크플로우 에러는 [`ProbeError`]로 수렴합니다.
//! 어떤 에러도 로컬에서 복구하지 않으며, 발생 즉시 실행 전체를 중단합니다.

/// smsprobe 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 외부 API 응답 형식 에러
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// 네트워크 전송 에러
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// 식별자 저장소 에러
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// 시크릿 조회 에러
    #[error("secret error: {0}")]
    Secret(#[from] SecretError),

    /// 메일 전송 에러
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 외부 API가 기대한 필드 없이 응답한 경우
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// 응답에 필수 필드가 없거나 형식이 다름
    #[error("malformed response from {service}: {reason}")]
    MalformedResponse {
        /// 응답을 보낸 서비스 (provider, messaging)
        service: String,
        /// 실패 사유
        reason: String,
        /// 원본 응답 본문 (진단용)
        raw: String,
    },
}

impl UpstreamError {
    /// 원본 응답을 로그로 남긴 뒤 에러를 생성합니다.
    pub fn malformed(service: &str, reason: impl Into<String>, raw: impl Into<String>) -> Self {
        let reason = reason.into();
        let raw = raw.into();
        tracing::error!(
            service,
            reason = %reason,
            raw = %raw,
            "unexpected response received from upstream service"
        );
        Self::MalformedResponse {
            service: service.to_owned(),
            reason,
            raw,
        }
    }
}

/// 네트워크 전송 에러
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// 요청 전송 또는 응답 수신 실패
    #[error("request to {service} failed: {reason}")]
    Request { service: String, reason: String },

    /// 성공이 아닌 HTTP 상태 코드
    #[error("{service} returned status {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },
}

/// 식별자 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 예약 키 또는 항목 키가 존재하지 않음 (초기화되지 않았거나 손상됨)
    #[error("key {key} not found in identifier store")]
    NotFound { key: u64 },

    /// 레코드는 있지만 내용이 예상과 다름
    #[error("corrupt record at key {key}: {reason}")]
    Corrupt { key: u64, reason: String },

    /// 백엔드 접근 실패
    #[error("backend failure: {0}")]
    Backend(String),
}

/// 시크릿 조회 에러
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// 시크릿 소스에 접근할 수 없음
    #[error("secret source unavailable: {0}")]
    Unavailable(String),

    /// 시크릿 형식 오류
    #[error("secret payload is not a JSON object of strings: {0}")]
    Malformed(String),

    /// 필요한 키가 번들에 없음
    #[error("secret '{0}' missing from credential bundle")]
    Missing(String),
}

/// 메일 작성/전송 에러
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// 주소 파싱 실패
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// 메시지 조립 실패
    #[error("failed to build message: {0}")]
    Build(String),

    /// SMTP 전송 실패
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_names_key() {
        let err = StoreError::NotFound { key: 0 };
        assert!(err.to_string().contains("key 0"));
    }

    #[test]
    fn malformed_keeps_raw_body() {
        let err = UpstreamError::malformed("provider", "empty test list", "[]");
        let UpstreamError::MalformedResponse { service, raw, .. } = &err;
        assert_eq!(service, "provider");
        assert_eq!(raw, "[]");
        assert!(err.to_string().contains("empty test list"));
    }

    #[test]
    fn converts_into_probe_error() {
        let err: ProbeError = StoreError::NotFound { key: 3 }.into();
        assert!(matches!(err, ProbeError::Store(StoreError::NotFound { key: 3 })));

        let err: ProbeError = TransportError::Status {
            service: "messaging".to_owned(),
            status: 502,
            body: "bad gateway".to_owned(),
        }
        .into();
        assert!(err.to_string().contains("502"));
    }
}
