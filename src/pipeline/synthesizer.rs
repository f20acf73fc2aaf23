//! ResponseSynthesizer：把问询、思考、动作与外部结果交给 LLM，生成最终回答
//!
//! 单次调用、不重试；任何失败都是 SynthesisFailed。

use std::sync::Arc;

use crate::actions::ThoughtAndAction;
use crate::core::AgentError;
use crate::llm::{LlmClient, Message};
use crate::pipeline::prompts::synthesis_prompt;
use crate::providers::ExternalResult;

pub struct ResponseSynthesizer {
    llm: Arc<dyn LlmClient>,
}

impl ResponseSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn synthesize(
        &self,
        user_inquiry: &str,
        thought_and_action: &ThoughtAndAction,
        result: &ExternalResult,
    ) -> Result<String, AgentError> {
        let messages = vec![Message::user(synthesis_prompt(
            user_inquiry,
            thought_and_action,
            result,
        ))];
        self.llm
            .complete(&messages)
            .await
            .map_err(|e| AgentError::SynthesisFailed(e.to_string()))
    }
}
