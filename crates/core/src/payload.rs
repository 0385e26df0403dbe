//! 메시징 플랫폼 요청 본문
//!
//! 필드명과 문자열 플래그("false", "0" 등)는 플랫폼 REST API 형식을 그대로 따릅니다.

use serde::Serialize;

/// 연락처 생성 요청
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub organization_id: String,
    pub last_name: String,
    pub status: String,
    pub country: String,
    pub record_type_id: String,
    pub account_id: String,
    pub external_id: String,
    pub paths: Vec<ContactPath>,
    pub first_name: String,
    pub timezone_id: String,
}

/// 연락처의 전달 경로 (SMS 번호)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPath {
    pub wait_time: String,
    pub path_id: String,
    pub country_code: String,
    pub value: String,
    pub skip_validation: String,
}

/// 알림 생성 요청
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub status: String,
    pub organization_id: String,
    pub priority: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: NotificationMessage,
    pub broadcast_contacts: BroadcastContacts,
    pub broadcast_settings: BroadcastSettings,
    // 플랫폼 API가 소문자 키를 사용
    #[serde(rename = "launchtype")]
    pub launch_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub content_type: String,
    pub title: String,
    pub text_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastContacts {
    pub contact_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastSettings {
    pub language: String,
    pub confirm: String,
    pub deliver_paths: Vec<DeliverPath>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverPath {
    pub account_id: String,
    pub path_id: String,
    pub organization_id: String,
    pub id: String,
    pub status: String,
    pub seq: u32,
    pub prompt: String,
    pub ext_required: String,
    pub display_flag: String,
    pub default: String,
}
