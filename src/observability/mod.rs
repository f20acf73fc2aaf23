//! 可观测性：tracing 日志初始化
//!
//! 默认级别 info，可通过 RUST_LOG 覆盖；重复初始化时静默忽略（测试中多次调用）。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_DIRECTIVE: &str = "info";

/// 构建日志过滤器：优先 RUST_LOG，否则使用 default_directive
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVE))
        .with(fmt::layer().with_target(false))
        .try_init();
}
