//! 결과 수집기
//!
//! 저장소에서 읽은 id 순서대로 provider 결과를 하나씩 조회하고
//! 리포트용 [`ResultProfile`]로 정규화합니다. 조회 실패 시 즉시 중단합니다.

use tracing::{debug, info};

use smsprobe_core::error::{ProbeError, UpstreamError};
use smsprobe_core::metrics as m;
use smsprobe_core::pipeline::TestProvider;
use smsprobe_core::types::{
    DELIVERED_LABEL, NOT_APPLICABLE, POSITIVE_STATUS, RawTestResult, ResultProfile,
};

/// provider 원본 결과를 리포트 행으로 변환합니다.
///
/// `POSITIVE` 결과는 `DELIVERED`로 표시하고 전달 필드를 채우며,
/// 그 외 상태는 전달 필드를 `N/A`로 두고 원본 상태를 유지합니다.
///
/// # Errors
///
/// `POSITIVE` 결과에 `textDelivered`, `receiptDelay`, `senderDelivered` 중
/// 하나라도 없으면 `UpstreamError::MalformedResponse`를 반환합니다.
pub fn profile_from_raw(raw: RawTestResult) -> Result<ResultProfile, ProbeError> {
    if raw.test_status != POSITIVE_STATUS {
        return Ok(ResultProfile {
            id: raw.id,
            country_name: raw.country_name,
            provider_name: raw.provider_name,
            text_delivered: NOT_APPLICABLE.to_owned(),
            receipt_delay: NOT_APPLICABLE.to_owned(),
            test_status: raw.test_status,
            received_from: NOT_APPLICABLE.to_owned(),
        });
    }

    let (Some(text_delivered), Some(receipt_delay), Some(received_from)) = (
        raw.text_delivered.clone(),
        raw.receipt_delay.clone(),
        raw.sender_delivered.clone(),
    ) else {
        let field = if raw.text_delivered.is_none() {
            "textDelivered"
        } else if raw.receipt_delay.is_none() {
            "receiptDelay"
        } else {
            "senderDelivered"
        };
        return Err(UpstreamError::malformed(
            "provider",
            format!("positive result {} missing field '{field}'", raw.id),
            format!("{raw:?}"),
        )
        .into());
    };

    Ok(ResultProfile {
        id: raw.id,
        country_name: raw.country_name,
        provider_name: raw.provider_name,
        text_delivered,
        receipt_delay: format!("{receipt_delay} seconds"),
        test_status: DELIVERED_LABEL.to_owned(),
        received_from,
    })
}

/// 모든 id의 결과를 순서대로 조회합니다.
pub async fn collect<P: TestProvider>(
    provider: &P,
    token: &str,
    test_ids: &[String],
) -> Result<Vec<ResultProfile>, ProbeError> {
    let mut profiles = Vec::with_capacity(test_ids.len());

    for test_id in test_ids {
        let raw = provider.get_result(token, test_id).await?;
        let profile = profile_from_raw(raw)?;
        debug!(
            test_id = %profile.id,
            status = %profile.test_status,
            country = %profile.country_name,
            "result collected"
        );
        metrics::counter!(
            m::REPORT_RESULTS_COLLECTED_TOTAL,
            m::LABEL_STATUS => profile.test_status.clone()
        )
        .increment(1);
        profiles.push(profile);
    }

    let delivered = profiles.iter().filter(|p| p.is_delivered()).count();
    info!(total = profiles.len(), delivered, "results collected");
    Ok(profiles)
}
