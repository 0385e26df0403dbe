//! HTTP adapter for the messaging platform REST API.
//!
//! Contacts and notifications are created under the configured organization:
//!
//! ```text
//! POST {endpoint}/rest/contacts/{orgId}       -> {"id": ...}
//! POST {endpoint}/rest/notifications/{orgId}  -> {"id": ...}
//! ```

use tracing::debug;

use smsprobe_core::config::MessagingConfig;
use smsprobe_core::error::ProbeError;
use smsprobe_core::payload::{ContactPayload, NotificationPayload};
use smsprobe_core::pipeline::MessagingPlatform;
use smsprobe_core::types::{Contact, NotificationRecord};

use crate::http::{build_client, required_scalar, send_json};

const SERVICE: &str = "messaging";

/// reqwest-backed [`MessagingPlatform`], authenticated with an API key.
#[derive(Clone)]
pub struct HttpMessagingPlatform {
    client: reqwest::Client,
    endpoint: String,
    org_id: String,
    api_key: String,
}

impl std::fmt::Debug for HttpMessagingPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMessagingPlatform")
            .field("endpoint", &self.endpoint)
            .field("org_id", &self.org_id)
            .finish_non_exhaustive()
    }
}

impl HttpMessagingPlatform {
    pub fn new(config: &MessagingConfig, api_key: impl Into<String>) -> Result<Self, ProbeError> {
        Ok(Self {
            client: build_client(SERVICE, config.request_timeout_secs)?,
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            org_id: config.org_id.clone(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/rest/{resource}/{}", self.endpoint, self.org_id)
    }
}

impl MessagingPlatform for HttpMessagingPlatform {
    async fn create_contact(&self, payload: &ContactPayload) -> Result<Contact, ProbeError> {
        debug!(external_id = %payload.external_id, "creating contact");
        let request = self
            .client
            .post(self.url("contacts"))
            .header("Authorization", &self.api_key)
            .json(payload);
        let body = send_json(SERVICE, request).await?;
        Ok(Contact {
            contact_id: required_scalar(SERVICE, &body, "id")?,
        })
    }

    async fn create_notification(
        &self,
        payload: &NotificationPayload,
    ) -> Result<NotificationRecord, ProbeError> {
        debug!(title = %payload.message.title, "creating notification");
        let request = self
            .client
            .post(self.url("notifications"))
            .header("Authorization", &self.api_key)
            .json(payload);
        let body = send_json(SERVICE, request).await?;
        Ok(NotificationRecord {
            notification_id: required_scalar(SERVICE, &body, "id")?,
        })
    }
}
