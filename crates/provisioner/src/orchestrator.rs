//! 프로비저닝 오케스트레이터
//!
//! 국가 → 네트워크 → 반복 순서로 순회하며 각 반복마다 다음을 수행합니다:
//!
//! ```text
//! create_test ──▶ create_contact ──▶ pace ──▶ create_notification ──▶ pace
//! ```
//!
//! 생성된 테스트 id는 순서대로 모아 두었다가 루프가 끝난 뒤 저장소에 한 번만 기록합니다.
//! 중간에 실패하면 저장소는 건드리지 않으며, 이미 생성된 id를 에러 로그로 남깁니다.

use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span, warn};

use smsprobe_core::config::ProbeConfig;
use smsprobe_core::error::{ProbeError, UpstreamError};
use smsprobe_core::metrics as m;
use smsprobe_core::pipeline::{MessagingPlatform, SecretResolver, TestProvider};
use smsprobe_core::types::{CountryTargets, NetworkTarget, ProvisionedTest};
use smsprobe_store::{IdentifierStore, KvBackend};

use crate::pacing::Pacer;
use crate::template::PayloadTemplates;

/// 한 번의 프로비저닝 실행 결과
#[derive(Debug, Clone)]
pub struct ProvisionSummary {
    /// 실행 상관 id
    pub run_id: String,
    /// 저장소에 기록된 테스트 id (생성 순서)
    pub test_ids: Vec<String>,
}

/// 테스트 생성과 알림 전송을 순서대로 수행하는 오케스트레이터
pub struct Provisioner<P, M, Z> {
    provider: P,
    messaging: M,
    pacer: Z,
    templates: PayloadTemplates,
    ttl_secs: u64,
    tests_per_network: usize,
}

impl<P, M, Z> Provisioner<P, M, Z>
where
    P: TestProvider,
    M: MessagingPlatform,
    Z: Pacer,
{
    pub fn new(provider: P, messaging: M, pacer: Z, config: &ProbeConfig) -> Self {
        Self {
            provider,
            messaging,
            pacer,
            templates: PayloadTemplates::from_config(&config.messaging),
            ttl_secs: config.provider.test_ttl_secs,
            tests_per_network: config.provisioning.tests_per_network,
        }
    }

    /// 모든 대상에 대해 테스트를 생성하고 알림을 보냅니다.
    ///
    /// 반환되는 목록의 순서는 생성 순서와 같습니다.
    pub async fn provision_all(
        &self,
        token: &str,
        targets: &[CountryTargets],
    ) -> Result<Vec<String>, ProbeError> {
        let mut created = Vec::new();
        match self.provision_into(token, targets, &mut created).await {
            Ok(()) => Ok(created),
            Err(e) => {
                if !created.is_empty() {
                    error!(
                        created = created.len(),
                        test_ids = ?created,
                        "provisioning aborted; these tests were created but not persisted"
                    );
                }
                Err(e)
            }
        }
    }

    async fn provision_into(
        &self,
        token: &str,
        targets: &[CountryTargets],
        created: &mut Vec<String>,
    ) -> Result<(), ProbeError> {
        for target in targets {
            info!(country = %target.country, networks = target.networks.len(), "provisioning country");
            for network in &target.networks {
                for repetition in 1..=self.tests_per_network {
                    let test = self.create_test(token, network).await?;
                    created.push(test.test_id.clone());
                    metrics::counter!(
                        m::PROVISION_TESTS_CREATED_TOTAL,
                        m::LABEL_COUNTRY => target.country.clone()
                    )
                    .increment(1);
                    debug!(
                        network = %network,
                        repetition,
                        test_id = %test.test_id,
                        "provider test created"
                    );

                    self.notify(&target.country, &test).await?;
                }
            }
        }
        Ok(())
    }

    /// provider 응답 목록의 첫 번째 테스트를 사용합니다.
    async fn create_test(
        &self,
        token: &str,
        network: &NetworkTarget,
    ) -> Result<ProvisionedTest, ProbeError> {
        let tests = self
            .provider
            .create_test(token, &network.mcc, &network.mnc, self.ttl_secs)
            .await?;

        if tests.len() > 1 {
            warn!(network = %network, returned = tests.len(), "provider returned extra tests; using the first");
        }

        tests.into_iter().next().ok_or_else(|| {
            UpstreamError::malformed(
                "provider",
                format!("empty test list for network {network}"),
                "[]",
            )
            .into()
        })
    }

    async fn notify(&self, country: &str, test: &ProvisionedTest) -> Result<(), ProbeError> {
        let contact = self
            .messaging
            .create_contact(&self.templates.contact(country, &test.phone_number))
            .await?;
        metrics::counter!(m::PROVISION_CONTACTS_CREATED_TOTAL).increment(1);
        self.pacer.pace().await;

        let notification = self
            .messaging
            .create_notification(&self.templates.notification(
                country,
                &test.test_id_text,
                &contact.contact_id,
            ))
            .await?;
        metrics::counter!(m::PROVISION_NOTIFICATIONS_SENT_TOTAL).increment(1);
        debug!(
            contact_id = %contact.contact_id,
            notification_id = %notification.notification_id,
            "notification sent"
        );
        self.pacer.pace().await;
        Ok(())
    }
}

/// 프로비저닝 워크플로우 진입점
///
/// 트리거 이벤트 내용은 사용하지 않으며 로그에만 남깁니다.
/// 메시징 플랫폼은 시크릿에서 API 키를 읽은 뒤 `connect_messaging`으로 생성합니다.
pub async fn run_provisioning<R, P, M, F, B, Z>(
    event: &Value,
    config: &ProbeConfig,
    secrets: &R,
    provider: P,
    connect_messaging: F,
    store: &IdentifierStore<B>,
    pacer: Z,
) -> Result<ProvisionSummary, ProbeError>
where
    R: SecretResolver,
    P: TestProvider,
    M: MessagingPlatform,
    F: FnOnce(&str) -> Result<M, ProbeError>,
    B: KvBackend,
    Z: Pacer,
{
    let run_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("provisioning", run_id = %run_id);

    async move {
        info!(
            environment = %config.messaging.environment_name,
            expected_tests = config.provisioning.expected_test_count(),
            "provisioning started"
        );
        info!(event = %event, "trigger event");

        let bundle = secrets.resolve().await?;
        let app_id = bundle.get(&config.secrets.app_id_name)?;
        let app_key = bundle.get(&config.secrets.app_key_name)?;
        let api_key = bundle.get(&config.secrets.messaging_api_key_name)?;

        let token = provider.obtain_token(app_id, app_key).await?;
        let messaging = connect_messaging(api_key)?;

        let provisioner = Provisioner::new(provider, messaging, pacer, config);
        let test_ids = provisioner
            .provision_all(&token, &config.provisioning.targets)
            .await?;

        store.write(&test_ids).await?;
        info!(count = test_ids.len(), "provisioning complete");

        Ok(ProvisionSummary { run_id, test_ids })
    }
    .instrument(span)
    .await
}
