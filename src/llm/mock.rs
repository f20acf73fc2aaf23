//! Scripted LLM 客户端（用于测试，无需 API）
//!
//! 按顺序回放预置回复，并记录每次收到的消息列表；脚本耗尽后返回 fallback。
//! 未配置 API Key 时也作为兜底后端，固定回复「无可用动作」。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, Message, TokenUsage};

/// 未配置 API Key 时的固定回复
pub const OFFLINE_REPLY: &str = r#"{"thought":"No language model is configured, so I cannot pick an action for this request.","action":null}"#;

/// Scripted 客户端：回放 responses，记录 requests
#[derive(Debug)]
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    fallback: Result<String, LlmError>,
    requests: Mutex<Vec<Vec<Message>>>,
    /// 每次成功回复计入的 (prompt, completion) token 数
    per_call: (u64, u64),
    usage: TokenUsage,
}

impl ScriptedLlmClient {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
            fallback: Err(LlmError::EmptyResponse),
            requests: Mutex::new(Vec::new()),
            per_call: (0, 0),
            usage: TokenUsage::new(),
        }
    }

    /// 每次都返回同一条回复
    pub fn always(response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Ok(response.into()),
            requests: Mutex::new(Vec::new()),
            per_call: (0, 0),
            usage: TokenUsage::new(),
        }
    }

    /// 兜底后端：无 API Key 时使用
    pub fn offline() -> Self {
        Self::always(OFFLINE_REPLY)
    }

    /// 追加一条失败回复（模拟传输错误）
    pub fn then_error(self, err: LlmError) -> Self {
        if let Ok(mut q) = self.responses.lock() {
            q.push_back(Err(err));
        }
        self
    }

    /// 追加一条成功回复
    pub fn then(self, response: impl Into<String>) -> Self {
        if let Ok(mut q) = self.responses.lock() {
            q.push_back(Ok(response.into()));
        }
        self
    }

    /// 每次成功回复按固定数量累计 token
    pub fn with_usage_per_call(mut self, prompt: u64, completion: u64) -> Self {
        self.per_call = (prompt, completion);
        self
    }

    /// 已收到的请求（按调用顺序）
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        if let Ok(mut r) = self.requests.lock() {
            r.push(messages.to_vec());
        }
        let next = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        let reply = next.unwrap_or_else(|| self.fallback.clone());
        if reply.is_ok() {
            self.usage.add(self.per_call.0, self.per_call.1);
        }
        reply
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.usage.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replays_in_order() {
        let llm = ScriptedLlmClient::new(["first", "second"]);
        assert_eq!(llm.complete(&[Message::user("a")]).await.unwrap(), "first");
        assert_eq!(llm.complete(&[Message::user("b")]).await.unwrap(), "second");
        assert_eq!(
            llm.complete(&[Message::user("c")]).await,
            Err(LlmError::EmptyResponse)
        );
        assert_eq!(llm.call_count(), 3);
        assert_eq!(llm.requests()[1][0].content, "b");
    }

    #[tokio::test]
    async fn test_offline_reply_is_no_action() {
        let llm = ScriptedLlmClient::offline();
        let reply = llm.complete(&[]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert!(value["action"].is_null());
    }

    #[tokio::test]
    async fn test_usage_counts_successful_replies_only() {
        let llm = ScriptedLlmClient::new(["ok"])
            .then_error(LlmError::Timeout(5))
            .with_usage_per_call(10, 4);
        assert_eq!(llm.token_usage(), (0, 0, 0));
        llm.complete(&[]).await.unwrap();
        assert!(llm.complete(&[]).await.is_err());
        assert_eq!(llm.token_usage(), (10, 4, 14));
    }

    #[tokio::test]
    async fn test_then_error() {
        let llm = ScriptedLlmClient::new(Vec::<String>::new()).then_error(LlmError::Timeout(5));
        assert_eq!(llm.complete(&[]).await, Err(LlmError::Timeout(5)));
    }
}
