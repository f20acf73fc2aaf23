//! Agent 运行时：从配置装配问询流水线
//!
//! create_pipeline 构建 LLM 客户端、三个数据提供方、解析器 / 校验器 / 分发器 / 合成器；
//! 无 API Key 时退回 ScriptedLlmClient::offline（始终回答「无可用动作」）。

use std::sync::Arc;
use std::time::Duration;

use crate::actions::catalog;
use crate::config::AppConfig;
use crate::core::{AgentError, Delay, TokioDelay};
use crate::llm::{LlmClient, OpenAiClient, ScriptedLlmClient};
use crate::pipeline::prompts::SYSTEM_PROMPT;
use crate::pipeline::{
    ActionDispatcher, InquiryPipeline, IntentResolver, ResolutionValidator, ResponseSynthesizer,
};
use crate::providers::{
    http_client, GeocodingProvider, NewsApiClient, NewsProvider, OpenMeteoGeocoder,
    OpenMeteoWeather, WeatherProvider,
};

/// 按配置创建 LLM 客户端
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    match cfg.llm.resolved_api_key() {
        Some(key) => {
            tracing::info!("Using OpenAI-compatible LLM ({})", cfg.llm.model);
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                Some(key.as_str()),
                cfg.llm.request_timeout_secs,
            ))
        }
        None => {
            tracing::warn!("No OPENAI_API_KEY set, using offline LLM");
            Arc::new(ScriptedLlmClient::offline())
        }
    }
}

/// 外部协作方集合，便于在测试中整体替换
pub struct Collaborators {
    pub llm: Arc<dyn LlmClient>,
    pub geocoder: Arc<dyn GeocodingProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub delay: Arc<dyn Delay>,
}

impl Collaborators {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AgentError> {
        let client = http_client(cfg.providers.timeout_secs)?;
        if cfg.providers.resolved_news_token().is_none() {
            tracing::warn!("No NEWS_API_TOKEN set, news lookups will fail");
        }
        Ok(Self {
            llm: create_llm_from_config(cfg),
            geocoder: Arc::new(OpenMeteoGeocoder::new(
                client.clone(),
                cfg.providers.geocoding_url.clone(),
            )),
            weather: Arc::new(OpenMeteoWeather::new(
                client.clone(),
                cfg.providers.weather_url.clone(),
            )),
            news: Arc::new(NewsApiClient::new(
                client,
                cfg.providers.news_url.clone(),
                cfg.providers.resolved_news_token(),
            )),
            delay: Arc::new(TokioDelay),
        })
    }
}

/// 用给定协作方与配置装配流水线
pub fn build_pipeline(cfg: &AppConfig, collaborators: Collaborators) -> InquiryPipeline {
    let llm = collaborators.llm;
    let resolver = IntentResolver::new(llm.clone(), SYSTEM_PROMPT, catalog());
    let validator = ResolutionValidator::new(resolver, collaborators.delay)
        .with_attempt_limit(cfg.resolution.attempt_limit)
        .with_retry_delay(Duration::from_millis(cfg.resolution.retry_delay_ms));
    let dispatcher = ActionDispatcher::new(
        collaborators.geocoder,
        collaborators.weather,
        collaborators.news,
    )
    .with_news_window(
        cfg.providers.news_lookback_hours,
        cfg.providers.news_page_size,
    );
    let synthesizer = ResponseSynthesizer::new(llm.clone());
    InquiryPipeline::new(llm, validator, dispatcher, synthesizer)
}

/// 从配置创建生产用流水线
pub fn create_pipeline(cfg: &AppConfig) -> Result<InquiryPipeline, AgentError> {
    Ok(build_pipeline(cfg, Collaborators::from_config(cfg)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_pipeline_answers_without_action() {
        let cfg = AppConfig::default();
        let mut collaborators = Collaborators::from_config(&cfg).unwrap();
        collaborators.llm = Arc::new(ScriptedLlmClient::offline());
        let pipeline = build_pipeline(&cfg, collaborators);
        let answer = pipeline.process("weather in Paris?").await.unwrap();
        assert!(answer.contains("No language model is configured"));
    }
}
