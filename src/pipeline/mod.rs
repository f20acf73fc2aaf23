//! 问询流水线：解析（有界重试）-> 分发 -> 合成
//!
//! Received -> Resolving -> {ResolutionFailed | Resolved}；
//! Resolved(无动作) -> Done；Resolved(动作) -> Dispatching -> {DispatchFailed | Dispatched}
//! -> Synthesizing -> {SynthesisFailed | Done}。
//! 流水线只持有不可变组件，每次问询的 ThoughtAndAction 与外部结果都只属于该次调用。

pub mod dispatcher;
pub mod prompts;
pub mod resolver;
pub mod synthesizer;
pub mod validator;

pub use dispatcher::{ActionDispatcher, DispatchOutcome};
pub use resolver::IntentResolver;
pub use synthesizer::ResponseSynthesizer;
pub use validator::{Resolution, ResolutionValidator};

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::core::{AgentError, PipelinePhase, PipelineTrace};
use crate::llm::LlmClient;

pub struct InquiryPipeline {
    /// 解析与合成共用的 LLM，只用于读取 token 统计
    llm: Arc<dyn LlmClient>,
    validator: ResolutionValidator,
    dispatcher: ActionDispatcher,
    synthesizer: ResponseSynthesizer,
}

impl InquiryPipeline {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        validator: ResolutionValidator,
        dispatcher: ActionDispatcher,
        synthesizer: ResponseSynthesizer,
    ) -> Self {
        Self {
            llm,
            validator,
            dispatcher,
            synthesizer,
        }
    }

    /// 处理一条用户问询，返回最终回答
    pub async fn process(&self, user_inquiry: &str) -> Result<String, AgentError> {
        self.process_traced(user_inquiry).await.0
    }

    /// 同 process，并返回本次问询经过的阶段轨迹
    pub async fn process_traced(
        &self,
        user_inquiry: &str,
    ) -> (Result<String, AgentError>, PipelineTrace) {
        let span = tracing::info_span!(
            "inquiry",
            id = %Uuid::new_v4(),
            tokens = tracing::field::Empty
        );
        async {
            let (_, _, tokens_before) = self.llm.token_usage();
            let mut trace = PipelineTrace::new();
            let result = self.run(user_inquiry, &mut trace).await;

            let (_, _, tokens_after) = self.llm.token_usage();
            trace.set_tokens(tokens_after.saturating_sub(tokens_before));
            tracing::Span::current().record("tokens", trace.tokens());
            tracing::info!(attempts = trace.attempts(), tokens = trace.tokens(), "inquiry finished");

            if let Err(err) = &result {
                tracing::error!(error = %err, phase = ?trace.current(), "Unable to fulfill user inquiry");
            }
            (result, trace)
        }
        .instrument(span)
        .await
    }

    async fn run(&self, user_inquiry: &str, trace: &mut PipelineTrace) -> Result<String, AgentError> {
        trace.enter(PipelinePhase::Resolving);
        let resolution = match self.validator.resolve_and_validate(user_inquiry).await {
            Ok(resolution) => resolution,
            Err(err) => {
                if let AgentError::ResolutionFailed { attempts } = &err {
                    trace.set_attempts(*attempts);
                }
                trace.enter(PipelinePhase::ResolutionFailed);
                return Err(err);
            }
        };
        trace.set_attempts(resolution.attempts);
        trace.enter(PipelinePhase::Resolved);
        let thought_and_action = resolution.thought_and_action;

        if thought_and_action.action.is_some() {
            trace.enter(PipelinePhase::Dispatching);
        }
        let result = match self.dispatcher.dispatch(&thought_and_action).await {
            Ok(DispatchOutcome::Dispatched(result)) => result,
            Ok(DispatchOutcome::NoAction(thought)) => {
                trace.enter(PipelinePhase::Done);
                return Ok(thought);
            }
            Err(err) => {
                trace.enter(PipelinePhase::DispatchFailed);
                return Err(err);
            }
        };
        trace.enter(PipelinePhase::Dispatched);

        trace.enter(PipelinePhase::Synthesizing);
        match self
            .synthesizer
            .synthesize(user_inquiry, &thought_and_action, &result)
            .await
        {
            Ok(answer) => {
                trace.enter(PipelinePhase::Done);
                Ok(answer)
            }
            Err(err) => {
                trace.enter(PipelinePhase::SynthesisFailed);
                Err(err)
            }
        }
    }
}
