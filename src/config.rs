//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `CURRENT_EVENTS__*` 覆盖（双下划线表示嵌套，如 `CURRENT_EVENTS__LLM__MODEL=gpt-4o`）。
//! API Key 未写入配置时回退到 `OPENAI_API_KEY` / `NEWS_API_TOKEN`（可来自 .env）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::providers::geocoding::DEFAULT_GEOCODING_URL;
use crate::providers::news::{DEFAULT_LOOKBACK_HOURS, DEFAULT_NEWS_URL, DEFAULT_PAGE_SIZE};
use crate::providers::weather::DEFAULT_WEATHER_URL;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub resolution: ResolutionSection,
    pub providers: ProvidersSection,
}

/// [app] 段：名称、退出指令、交互提示语
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: Option<String>,
    pub quit_token: String,
    pub prompt: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            quit_token: "q".to_string(),
            prompt: "What would you like me to do? ('q' to quit)".to_string(),
        }
    }
}

/// [llm] 段：模型、端点、Key、请求超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: crate::llm::openai::DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            request_timeout_secs: 60,
        }
    }
}

impl LlmSection {
    /// 配置中的 Key，否则 OPENAI_API_KEY；空字符串视为未设置
    pub fn resolved_api_key(&self) -> Option<String> {
        non_blank_or(self.api_key.as_deref(), || std::env::var("OPENAI_API_KEY").ok())
    }
}

/// [resolution] 段：解析重试上限与固定间隔
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionSection {
    pub attempt_limit: usize,
    pub retry_delay_ms: u64,
}

impl Default for ResolutionSection {
    fn default() -> Self {
        Self {
            attempt_limit: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// [providers] 段：地理编码 / 天气 / 新闻端点、新闻窗口与 HTTP 超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersSection {
    pub geocoding_url: String,
    pub weather_url: String,
    pub news_url: String,
    pub news_api_token: Option<String>,
    pub news_page_size: usize,
    pub news_lookback_hours: i64,
    pub timeout_secs: u64,
}

impl Default for ProvidersSection {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            news_url: DEFAULT_NEWS_URL.to_string(),
            news_api_token: None,
            news_page_size: DEFAULT_PAGE_SIZE,
            news_lookback_hours: DEFAULT_LOOKBACK_HOURS,
            timeout_secs: 15,
        }
    }
}

impl ProvidersSection {
    pub fn resolved_news_token(&self) -> Option<String> {
        non_blank_or(self.news_api_token.as_deref(), || {
            std::env::var("NEWS_API_TOKEN").ok()
        })
    }
}

/// 配置值为空白时再取回退值；回退值同样要求非空白
fn non_blank_or(configured: Option<&str>, fallback: impl FnOnce() -> Option<String>) -> Option<String> {
    let non_blank = |k: &String| !k.trim().is_empty();
    configured
        .map(String::from)
        .filter(non_blank)
        .or_else(fallback)
        .filter(non_blank)
}

/// 从 config 目录加载配置，环境变量 CURRENT_EVENTS__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 CURRENT_EVENTS__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("CURRENT_EVENTS")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
