//! IntentResolver：拼装两条消息（系统指令 + 嵌入目录与用户原文的提示）并调用 LLM
//!
//! 返回 LLM 原始文本，不做任何校验或重试；重试由 ResolutionValidator 负责。

use std::sync::Arc;

use crate::actions::{thought_and_action_schema_json, ActionCatalog};
use crate::core::AgentError;
use crate::llm::{LlmClient, Message};
use crate::pipeline::prompts::resolution_prompt;

pub struct IntentResolver {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    catalog: &'static ActionCatalog,
    schema: String,
}

impl IntentResolver {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        system_prompt: impl Into<String>,
        catalog: &'static ActionCatalog,
    ) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            catalog,
            schema: thought_and_action_schema_json(),
        }
    }

    /// 确定性的两条消息会话
    pub fn build_messages(&self, user_input: &str) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt.clone()),
            Message::user(resolution_prompt(self.catalog, &self.schema, user_input)),
        ]
    }

    /// 一次外呼，返回未经校验的原始文本
    pub async fn resolve(&self, user_input: &str) -> Result<String, AgentError> {
        let messages = self.build_messages(user_input);
        Ok(self.llm.complete(&messages).await?)
    }
}
