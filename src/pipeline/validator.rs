//! ResolutionValidator：有界重试的解析-校验循环
//!
//! 每次尝试：调用 IntentResolver 取原始文本 -> 严格解析为 ThoughtAndAction。
//! 成功立即返回；校验失败记录日志、固定间隔等待后重试（无退避、无抖动，最后一次失败后不等待）。
//! 传输错误不重试，直接上抛。全部尝试失败返回 ResolutionFailed。

use std::sync::Arc;
use std::time::Duration;

use crate::actions::ThoughtAndAction;
use crate::core::{AgentError, Delay};
use crate::pipeline::IntentResolver;

pub const DEFAULT_ATTEMPT_LIMIT: usize = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// 解析成功的结果与实际尝试次数
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub thought_and_action: ThoughtAndAction,
    pub attempts: usize,
}

pub struct ResolutionValidator {
    resolver: IntentResolver,
    delay: Arc<dyn Delay>,
    attempt_limit: usize,
    retry_delay: Duration,
}

impl ResolutionValidator {
    pub fn new(resolver: IntentResolver, delay: Arc<dyn Delay>) -> Self {
        Self {
            resolver,
            delay,
            attempt_limit: DEFAULT_ATTEMPT_LIMIT,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// 尝试上限，至少为 1
    pub fn with_attempt_limit(mut self, limit: usize) -> Self {
        self.attempt_limit = limit.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn attempt_limit(&self) -> usize {
        self.attempt_limit
    }

    pub async fn resolve_and_validate(&self, user_input: &str) -> Result<Resolution, AgentError> {
        for attempt in 1..=self.attempt_limit {
            let raw = self.resolver.resolve(user_input).await?;
            match ThoughtAndAction::parse(&raw) {
                Ok(thought_and_action) => {
                    tracing::debug!(attempt, "resolution validated");
                    return Ok(Resolution {
                        thought_and_action,
                        attempts: attempt,
                    });
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    tracing::warn!(attempt, limit = self.attempt_limit, error = %err, "Attempt {} failed", attempt);
                    if attempt < self.attempt_limit {
                        self.delay.wait(self.retry_delay).await;
                    }
                }
            }
        }

        tracing::error!(attempts = self.attempt_limit, "resolution exhausted");
        Err(AgentError::ResolutionFailed {
            attempts: self.attempt_limit,
        })
    }
}
