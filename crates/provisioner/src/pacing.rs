//! 쓰기 호출 사이의 고정 간격 제한
//!
//! [`Pacer`]는 오케스트레이터가 외부 쓰기 호출 사이에 호출합니다.
//! 스로틀링 신호에 반응하지 않는 정적 제한이며, 적응형 backoff가 필요해지면
//! 오케스트레이션 로직 변경 없이 다른 구현으로 교체할 수 있습니다.

use std::future::Future;
use std::time::Duration;

/// 외부 호출 간격 정책
pub trait Pacer: Send + Sync {
    /// 다음 외부 호출 전까지 대기합니다.
    fn pace(&self) -> impl Future<Output = ()> + Send;
}

/// 고정 시간만큼 대기하는 pacer
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelayPacer {
    /// 운영 기본값: 1초
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Pacer for FixedDelayPacer {
    async fn pace(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
