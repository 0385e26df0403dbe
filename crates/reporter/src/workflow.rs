//! 결과 리포트 워크플로우 진입점

use serde_json::Value;
use tracing::{Instrument, info, info_span};

use smsprobe_core::config::ProbeConfig;
use smsprobe_core::error::ProbeError;
use smsprobe_core::metrics as m;
use smsprobe_core::pipeline::{SecretResolver, TestProvider};
use smsprobe_store::{IdentifierStore, KvBackend};

use crate::collector::collect;
use crate::mail::{MailTransport, ReportEmail};
use crate::render::render_report;

/// 한 번의 리포트 실행 결과
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub run_id: String,
    /// 조회한 결과 수
    pub results: usize,
    /// 그 중 전달 성공 수
    pub delivered: usize,
    pub csv_attached: bool,
}

/// 저장된 id의 결과를 수집해 리포트를 렌더링하고 발송합니다.
///
/// 순서: 시크릿 조회 → 토큰 발급 → id 목록 읽기 → 결과 조회 → 렌더링 → 전송.
/// 어느 단계든 실패하면 메일은 발송되지 않습니다.
pub async fn run_report<R, P, B, T>(
    event: &Value,
    config: &ProbeConfig,
    secrets: &R,
    provider: &P,
    store: &IdentifierStore<B>,
    transport: &T,
) -> Result<ReportSummary, ProbeError>
where
    R: SecretResolver,
    P: TestProvider,
    B: KvBackend,
    T: MailTransport,
{
    let run_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("report", run_id = %run_id);

    async move {
        info!(report = %config.report.report_name, "report started");
        info!(event = %event, "trigger event");

        let bundle = secrets.resolve().await?;
        let token = provider
            .obtain_token(
                bundle.get(&config.secrets.app_id_name)?,
                bundle.get(&config.secrets.app_key_name)?,
            )
            .await?;

        let test_ids = store.read().await?;
        info!(count = test_ids.len(), "identifier list read");

        let profiles = collect(provider, &token, &test_ids).await?;
        let delivered = profiles.iter().filter(|p| p.is_delivered()).count();

        let rendered = render_report(&config.report, &profiles)?;
        let csv_attached = rendered.csv.is_some();
        let email = ReportEmail::new(&config.report, rendered);
        transport.send(&email).await?;
        metrics::counter!(m::REPORT_EMAILS_SENT_TOTAL).increment(1);

        info!(results = profiles.len(), delivered, csv_attached, "report complete");
        Ok(ReportSummary {
            run_id,
            results: profiles.len(),
            delivered,
            csv_attached,
        })
    }
    .instrument(span)
    .await
}
