//! 外部数据提供方：地理编码、天气、新闻
//!
//! 每个提供方是一个 async trait，生产实现基于 reqwest 发起一次 GET 并解码为强类型结果；
//! 分发器只依赖 trait，测试中替换为记录调用的替身。每次 HTTP 调用输出结构化审计日志（JSON）。

pub mod fake;
pub mod geocoding;
pub mod news;
pub mod weather;

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::core::AgentError;

pub use geocoding::{GeoLocation, GeocodingProvider, OpenMeteoGeocoder};
pub use news::{NewsApiClient, NewsArticle, NewsProvider, NewsQuery, NewsReport, NewsSource};
pub use weather::{CurrentConditions, CurrentUnits, OpenMeteoWeather, WeatherProvider, WeatherReport};

const USER_AGENT: &str = concat!("current-events/", env!("CARGO_PKG_VERSION"));

/// 处理器返回的结果；核心只把它序列化后交给合成阶段，不逐字段读取
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExternalResult {
    Weather(WeatherReport),
    News(NewsReport),
}

impl ExternalResult {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// 共享 HTTP 客户端：带超时与 User-Agent
pub fn http_client(timeout_secs: u64) -> Result<Client, AgentError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(AgentError::from)
}

/// 发起 GET 并解码 JSON；非 2xx 视为传输错误，错误信息带上响应体中的说明
pub(crate) async fn get_json<T>(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, AgentError>
where
    T: serde::de::DeserializeOwned,
{
    let start = Instant::now();
    let result = fetch::<T>(client, url, query).await;

    let audit = serde_json::json!({
        "event": "provider_audit",
        "provider": provider,
        "ok": result.is_ok(),
        "duration_ms": start.elapsed().as_millis() as u64,
    });
    tracing::info!(audit = %audit.to_string(), "provider");

    result.map_err(|e| AgentError::Transport(format!("{provider}: {e}")))
}

async fn fetch<T>(client: &Client, url: &str, query: &[(&str, String)]) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|e| e.to_string());
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// NewsAPI 以 4xx 返回 `{"status":"error","message":..}`，Open-Meteo 返回 `{"error":true,"reason":..}`
fn status_error(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("reason"))
            .and_then(serde_json::Value::as_str)
            .map(String::from)
    });
    match detail {
        Some(detail) => format!("{status}: {detail}"),
        None => status.to_string(),
    }
}
