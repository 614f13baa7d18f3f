//! 定时器实现

use async_trait::async_trait;
use cn19::Timer;
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;

/// 基于 `setTimeout` 的休眠
#[derive(Clone, Copy, Default)]
pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}
