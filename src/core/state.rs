//! 状态定义：问询流水线阶段与分发器状态
//!
//! 流水线按 Received -> Resolving -> Resolved -> (Dispatching -> Dispatched -> Synthesizing) -> Done 推进；
//! 任一失败都落到对应的终止阶段。PipelineTrace 记录一次问询走过的阶段序列，供日志与测试观察。

use serde::Serialize;

/// 问询流水线阶段
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum PipelinePhase {
    Received,
    Resolving,
    ResolutionFailed,
    Resolved,
    Dispatching,
    DispatchFailed,
    Dispatched,
    Synthesizing,
    SynthesisFailed,
    Done,
}

impl PipelinePhase {
    /// 是否为终止阶段
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelinePhase::Done
                | PipelinePhase::ResolutionFailed
                | PipelinePhase::DispatchFailed
                | PipelinePhase::SynthesisFailed
        )
    }
}

/// 分发器四状态
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DispatchState {
    /// 没有可用动作，直接返回 thought
    NoAction,
    PendingDispatch,
    Dispatched,
    DispatchFailed,
}

impl DispatchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DispatchState::PendingDispatch)
    }
}

/// 单次问询的阶段轨迹
#[derive(Clone, Debug, Serialize)]
pub struct PipelineTrace {
    phases: Vec<PipelinePhase>,
    attempts: usize,
    tokens: u64,
}

impl PipelineTrace {
    pub fn new() -> Self {
        Self {
            phases: vec![PipelinePhase::Received],
            attempts: 0,
            tokens: 0,
        }
    }

    pub fn enter(&mut self, phase: PipelinePhase) {
        tracing::debug!(phase = ?phase, "pipeline phase");
        self.phases.push(phase);
    }

    pub fn set_attempts(&mut self, attempts: usize) {
        self.attempts = attempts;
    }

    pub fn phases(&self) -> &[PipelinePhase] {
        &self.phases
    }

    /// 解析阶段实际调用 LLM 的次数
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn set_tokens(&mut self, tokens: u64) {
        self.tokens = tokens;
    }

    /// 本次问询消耗的 LLM token（解析与合成合计）
    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    pub fn current(&self) -> Option<&PipelinePhase> {
        self.phases.last()
    }
}

impl Default for PipelineTrace {
    fn default() -> Self {
        Self::new()
    }
}
