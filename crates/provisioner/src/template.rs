//! 연락처/알림 요청 템플릿
//!
//! 값 대부분은 배포 설정에서 오는 고정값이며, 테스트마다 달라지는 것은
//! 국가 코드, 목적지 번호, 테스트 식별 텍스트, 연락처 id 뿐입니다.

use smsprobe_core::config::MessagingConfig;
use smsprobe_core::payload::{
    BroadcastContacts, BroadcastSettings, ContactPath, ContactPayload, DeliverPath,
    NotificationMessage, NotificationPayload,
};

/// 활성 상태 코드
const STATUS_ACTIVE: &str = "A";

/// 알림 제목 접미어
const TITLE_SUFFIX: &str = " Short Auto Message";

/// 설정에서 만든 요청 템플릿
#[derive(Debug, Clone)]
pub struct PayloadTemplates {
    org_id: String,
    record_type_id: String,
    account_id: String,
    delivery_id: String,
    path_id: String,
    first_name: String,
    timezone_id: String,
    language: String,
    message_body: String,
}

impl PayloadTemplates {
    pub fn from_config(config: &MessagingConfig) -> Self {
        Self {
            org_id: config.org_id.clone(),
            record_type_id: config.record_type_id.clone(),
            account_id: config.account_id.clone(),
            delivery_id: config.delivery_id.clone(),
            path_id: config.path_id.clone(),
            first_name: config.contact_first_name.clone(),
            timezone_id: config.timezone_id.clone(),
            language: config.language.clone(),
            message_body: config.message_body.clone(),
        }
    }

    /// provider가 배정한 번호로 연락처 요청을 만듭니다.
    ///
    /// 번호는 성(last name), 외부 id, SMS 경로 값에 모두 사용됩니다.
    pub fn contact(&self, country: &str, phone_number: &str) -> ContactPayload {
        let country_code = country.to_uppercase();
        ContactPayload {
            organization_id: self.org_id.clone(),
            last_name: phone_number.to_owned(),
            status: STATUS_ACTIVE.to_owned(),
            country: country_code.clone(),
            record_type_id: self.record_type_id.clone(),
            account_id: "0".to_owned(),
            external_id: phone_number.to_owned(),
            paths: vec![ContactPath {
                wait_time: "0".to_owned(),
                path_id: self.path_id.clone(),
                country_code,
                value: phone_number.to_owned(),
                skip_validation: "false".to_owned(),
            }],
            first_name: self.first_name.clone(),
            timezone_id: self.timezone_id.clone(),
        }
    }

    /// 테스트 식별 텍스트를 본문 앞에 넣은 알림 요청을 만듭니다.
    pub fn notification(
        &self,
        country: &str,
        test_id_text: &str,
        contact_id: &str,
    ) -> NotificationPayload {
        NotificationPayload {
            status: STATUS_ACTIVE.to_owned(),
            organization_id: self.org_id.clone(),
            priority: "NonPriority".to_owned(),
            kind: "Standard".to_owned(),
            message: NotificationMessage {
                content_type: "Text".to_owned(),
                title: format!("{country}{TITLE_SUFFIX}"),
                text_message: format!("{test_id_text}{}", self.message_body),
            },
            broadcast_contacts: BroadcastContacts {
                contact_ids: vec![contact_id.to_owned()],
            },
            broadcast_settings: BroadcastSettings {
                language: self.language.clone(),
                confirm: "false".to_owned(),
                deliver_paths: vec![DeliverPath {
                    account_id: self.account_id.clone(),
                    path_id: self.path_id.clone(),
                    organization_id: self.org_id.clone(),
                    id: self.delivery_id.clone(),
                    status: STATUS_ACTIVE.to_owned(),
                    seq: 1,
                    prompt: "SMS".to_owned(),
                    ext_required: "false".to_owned(),
                    display_flag: "false".to_owned(),
                    default: "false".to_owned(),
                }],
            },
            launch_type: "SendNow".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> PayloadTemplates {
        PayloadTemplates::from_config(&MessagingConfig {
            org_id: "880001".to_owned(),
            record_type_id: "rt-7".to_owned(),
            account_id: "acc-3".to_owned(),
            delivery_id: "dp-9".to_owned(),
            ..MessagingConfig::default()
        })
    }

    #[test]
    fn contact_uses_upper_case_country_and_phone_everywhere() {
        let contact = templates().contact("ru", "79031234567");
        assert_eq!(contact.country, "RU");
        assert_eq!(contact.paths[0].country_code, "RU");
        assert_eq!(contact.last_name, "79031234567");
        assert_eq!(contact.external_id, "79031234567");
        assert_eq!(contact.paths[0].value, "79031234567");
        assert_eq!(contact.account_id, "0");
        assert_eq!(contact.organization_id, "880001");
    }

    #[test]
    fn contact_serializes_with_platform_field_names() {
        let json = serde_json::to_value(templates().contact("ua", "380501112233")).unwrap();
        assert_eq!(json["recordTypeId"], "rt-7");
        assert_eq!(json["paths"][0]["skipValidation"], "false");
        assert_eq!(json["timezoneId"], "America/New_York");
    }

    #[test]
    fn notification_embeds_test_id_text_before_body() {
        let payload = templates().notification("ua", "QZKXW", "c-55");
        assert_eq!(payload.message.title, "ua Short Auto Message");
        assert_eq!(
            payload.message.text_message,
            "QZKXW You may have to leave your home quickly to stay safe."
        );
        assert_eq!(payload.broadcast_contacts.contact_ids, vec!["c-55"]);
        assert_eq!(payload.broadcast_settings.language, "en_US");
    }

    #[test]
    fn notification_serializes_type_and_launchtype_keys() {
        let json = serde_json::to_value(templates().notification("ru", "X", "c")).unwrap();
        assert_eq!(json["type"], "Standard");
        assert_eq!(json["launchtype"], "SendNow");
        assert_eq!(json["broadcastSettings"]["deliverPaths"][0]["id"], "dp-9");
        assert_eq!(json["broadcastSettings"]["deliverPaths"][0]["seq"], 1);
    }
}
