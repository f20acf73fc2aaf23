//! 重试间隔：可注入的等待能力
//!
//! 生产环境用 tokio::time::sleep；测试中替换为只记录、不真正等待的实现。

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

/// 等待指定时长
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// 基于 tokio 计时器的真实等待
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 记录每次等待时长但立即返回（测试用）
#[derive(Debug, Default)]
pub struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.waits.lock().map(|w| w.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
        if let Ok(mut waits) = self.waits.lock() {
            waits.push(duration);
        }
    }
}
