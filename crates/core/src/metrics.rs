//! 메트릭 이름 상수
//!
//! 각 크레이트는 이 상수로 `metrics::counter!()`를 호출합니다.
//! 단발성 실행이므로 exporter는 설치하지 않으며, 레코더가 없으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `smsprobe_`
//! - 워크플로우명: `provision_`, `report_`
//! - 접미어: `_total` (counter)

/// 결과 상태 레이블 키 (DELIVERED, 그 외 provider 원본 상태)
pub const LABEL_STATUS: &str = "status";

/// 국가 레이블 키
pub const LABEL_COUNTRY: &str = "country";

/// 생성된 provider 테스트 수 (counter, label: country)
pub const PROVISION_TESTS_CREATED_TOTAL: &str = "smsprobe_provision_tests_created_total";

/// 생성된 연락처 수 (counter)
pub const PROVISION_CONTACTS_CREATED_TOTAL: &str = "smsprobe_provision_contacts_created_total";

/// 전송된 알림 수 (counter)
pub const PROVISION_NOTIFICATIONS_SENT_TOTAL: &str = "smsprobe_provision_notifications_sent_total";

/// 수집된 결과 수 (counter, label: status)
pub const REPORT_RESULTS_COLLECTED_TOTAL: &str = "smsprobe_report_results_collected_total";

/// 발송된 리포트 수 (counter)
pub const REPORT_EMAILS_SENT_TOTAL: &str = "smsprobe_report_emails_sent_total";
