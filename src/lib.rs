//! Current Events - 时事问答智能体
//!
//! 把自由文本请求解析为固定目录中的结构化动作，调用外部数据源执行，并生成自然语言回答。
//!
//! 模块划分：
//! - **actions**: 动作目录、动作 / 思考数据模型、输出 Schema
//! - **agent**: 从配置装配问询流水线
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、流水线状态、可注入的重试等待
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Scripted）
//! - **observability**: tracing 日志初始化
//! - **pipeline**: 解析（有界重试）、分发、合成
//! - **providers**: 地理编码、天气、新闻客户端
//! - **shell**: 交互式命令行循环

pub mod actions;
pub mod agent;
pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod shell;

pub use agent::{build_pipeline, create_pipeline, Collaborators};
pub use pipeline::InquiryPipeline;
