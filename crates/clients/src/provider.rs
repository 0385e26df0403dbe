//! HTTP adapter for the SMS test provider API.
//!
//! # Endpoints
//!
//! ```text
//! POST /v2/client/token          {"appId","appKey"}            -> {"value": token}
//! POST /v2/client/tests          {"destinationNetworks":[..]}  -> [{id, testIdText, phoneNumber}]
//! GET  /v2/client/results/{id}                                 -> {id, testStatus, ...}
//! ```
//!
//! Every call after the token exchange carries the token in the
//! `authorization` header as is (no `Bearer` prefix).

use serde_json::{Value, json};
use tracing::{debug, info};

use smsprobe_core::config::ProviderConfig;
use smsprobe_core::error::{ProbeError, UpstreamError};
use smsprobe_core::pipeline::TestProvider;
use smsprobe_core::types::{POSITIVE_STATUS, ProvisionedTest, RawTestResult};

use crate::http::{build_client, optional_scalar, required_scalar, send_json};

const SERVICE: &str = "provider";

/// reqwest-backed [`TestProvider`].
#[derive(Debug, Clone)]
pub struct HttpTestProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTestProvider {
    /// Creates a client for the provider at `config.base_url`.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProbeError> {
        Ok(Self {
            client: build_client(SERVICE, config.request_timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl TestProvider for HttpTestProvider {
    async fn obtain_token(&self, app_id: &str, app_key: &str) -> Result<String, ProbeError> {
        info!("obtaining provider bearer token");
        let request = self
            .client
            .post(self.url("/v2/client/token"))
            .json(&json!({ "appId": app_id, "appKey": app_key }));
        let body = send_json(SERVICE, request).await?;
        parse_token(&body)
    }

    async fn create_test(
        &self,
        token: &str,
        mcc: &str,
        mnc: &str,
        ttl_secs: u64,
    ) -> Result<Vec<ProvisionedTest>, ProbeError> {
        debug!(mcc, mnc, ttl_secs, "creating provider test");
        let request = self
            .client
            .post(self.url("/v2/client/tests"))
            .header("authorization", token)
            .json(&json!({
                "destinationNetworks": [{ "mcc": mcc, "mnc": mnc }],
                "testTimeToLiveInSeconds": ttl_secs.to_string(),
            }));
        let body = send_json(SERVICE, request).await?;
        parse_created_tests(&body)
    }

    async fn get_result(&self, token: &str, test_id: &str) -> Result<RawTestResult, ProbeError> {
        debug!(test_id, "fetching provider test result");
        let request = self
            .client
            .get(self.url(&format!("/v2/client/results/{test_id}")))
            .header("authorization", token);
        let body = send_json(SERVICE, request).await?;
        parse_result(&body)
    }
}

/// Extracts the token from `{"value": "..."}`.
pub fn parse_token(body: &Value) -> Result<String, ProbeError> {
    required_scalar(SERVICE, body, "value")
}

/// Decodes the test-creation response list.
///
/// An empty list is returned as is; callers decide whether that is an error.
pub fn parse_created_tests(body: &Value) -> Result<Vec<ProvisionedTest>, ProbeError> {
    let entries = body.as_array().ok_or_else(|| {
        UpstreamError::malformed(SERVICE, "expected a list of created tests", body.to_string())
    })?;

    entries
        .iter()
        .map(|entry| -> Result<ProvisionedTest, ProbeError> {
            Ok(ProvisionedTest {
                test_id: required_scalar(SERVICE, entry, "id")?,
                test_id_text: required_scalar(SERVICE, entry, "testIdText")?,
                phone_number: required_scalar(SERVICE, entry, "phoneNumber")?,
            })
        })
        .collect()
}

/// Decodes a single result lookup.
///
/// A `POSITIVE` result must carry `textDelivered`, `receiptDelay` and
/// `senderDelivered`; other statuses may omit them.
pub fn parse_result(body: &Value) -> Result<RawTestResult, ProbeError> {
    let network = body.get("destinationNetworkDetails").ok_or_else(|| {
        UpstreamError::malformed(
            SERVICE,
            "missing field 'destinationNetworkDetails'",
            body.to_string(),
        )
    })?;

    let test_status = required_scalar(SERVICE, body, "testStatus")?;
    let delivery_field = |field: &str| -> Result<Option<String>, ProbeError> {
        if test_status == POSITIVE_STATUS {
            required_scalar(SERVICE, body, field).map(Some)
        } else {
            Ok(optional_scalar(body, field))
        }
    };

    Ok(RawTestResult {
        id: required_scalar(SERVICE, body, "id")?,
        country_name: required_scalar(SERVICE, network, "countryName")?,
        provider_name: required_scalar(SERVICE, network, "providerName")?,
        text_delivered: delivery_field("textDelivered")?,
        receipt_delay: delivery_field("receiptDelay")?,
        sender_delivered: delivery_field("senderDelivered")?,
        test_status,
    })
}
