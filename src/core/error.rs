//! Agent 错误类型
//!
//! 一次问询的所有终止性失败都归入 AgentError；只有解析阶段（Validation）会被重试，
//! 其余错误直接中止当前问询并整体上报给调用方。

use thiserror::Error;

use crate::llm::LlmError;

/// 问询处理过程中可能出现的错误（校验、解析耗尽、未找到、未知动作、传输、合成、配置）
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM 输出不符合 ThoughtAndAction 结构（可重试）
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to parse LLM response after {attempts} attempts")]
    ResolutionFailed { attempts: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    /// 动作到达分发阶段却不属于已知变体：说明上游校验被绕过
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AgentError {
    /// 是否可由解析重试循环吸收
    pub fn is_retryable(&self) -> bool {
        matches!(self, AgentError::Validation(_))
    }
}

impl From<LlmError> for AgentError {
    fn from(err: LlmError) -> Self {
        AgentError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Transport(err.to_string())
    }
}
