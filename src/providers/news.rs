//! NewsAPI `everything` 检索：按主题查最近一段时间内的热门文章
//!
//! 请求参数 pageSize 之外，客户端在本地再截断一次，保证返回条数不超过上限。

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::AgentError;
use crate::providers::get_json;

pub const DEFAULT_NEWS_URL: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_PAGE_SIZE: usize = 4;
pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;

/// 按热度排序
const SORT_BY: &str = "popularity";

/// 新闻查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub topic: String,
    pub lookback_hours: i64,
    pub limit: usize,
}

impl NewsQuery {
    /// 最近 24 小时、按热度、最多 4 篇
    pub fn recent(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            limit: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_lookback_hours(mut self, hours: i64) -> Self {
        self.lookback_hours = hours;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 起始日期（YYYY-MM-DD）；窗口超出时间范围时为配置错误
    pub fn from_date(&self, now: DateTime<Utc>) -> Result<String, AgentError> {
        Duration::try_hours(self.lookback_hours)
            .and_then(|window| now.checked_sub_signed(window))
            .map(|from| from.format("%Y-%m-%d").to_string())
            .ok_or_else(|| {
                AgentError::Config(format!(
                    "news_lookback_hours out of range: {}",
                    self.lookback_hours
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsSource {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub source: NewsSource,
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: String,
    pub content: Option<String>,
}

/// 新闻结果；articles 可以为空，空列表不是错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsReport {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    /// status = "error" 时 NewsAPI 给出的说明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 新闻提供方
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search(&self, query: &NewsQuery) -> Result<NewsReport, AgentError>;
}

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    fn query(
        query: &NewsQuery,
        api_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<(&'static str, String)>, AgentError> {
        Ok(vec![
            ("q", query.topic.clone()),
            ("from", query.from_date(now)?),
            ("sortBy", SORT_BY.to_string()),
            ("apiKey", api_key.to_string()),
            ("pageSize", query.limit.to_string()),
        ])
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn search(&self, query: &NewsQuery) -> Result<NewsReport, AgentError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AgentError::Config("NEWS_API_TOKEN is not set".to_string()))?;

        let mut report: NewsReport = get_json(
            &self.client,
            "news",
            &self.base_url,
            &Self::query(query, api_key, Utc::now())?,
        )
        .await?;

        if report.status != "ok" {
            return Err(AgentError::Transport(format!(
                "news: {}",
                report.message.as_deref().unwrap_or(&report.status)
            )));
        }
        report.articles.truncate(query.limit);
        Ok(report)
    }
}
