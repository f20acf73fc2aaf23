//! 记录调用的提供方替身（测试用，无需网络）

use std::sync::Mutex;

use async_trait::async_trait;

use crate::actions::WeatherParameters;
use crate::core::AgentError;
use crate::providers::{
    CurrentConditions, GeoLocation, GeocodingProvider, NewsProvider, NewsQuery, NewsReport,
    WeatherProvider, WeatherReport,
};

/// 固定返回 locations 的地理编码替身
#[derive(Debug, Default)]
pub struct FakeGeocoder {
    locations: Vec<GeoLocation>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl FakeGeocoder {
    pub fn new(locations: Vec<GeoLocation>) -> Self {
        Self {
            locations,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 单一位置
    pub fn at(name: &str, latitude: f64, longitude: f64) -> Self {
        Self::new(vec![GeoLocation {
            name: name.to_string(),
            latitude,
            longitude,
        }])
    }

    /// 收到的 (city, state_or_province, country)
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GeocodingProvider for FakeGeocoder {
    async fn lookup(&self, location: &WeatherParameters) -> Result<Vec<GeoLocation>, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((
                location.city.clone(),
                location.state_or_province.clone(),
                location.country.clone(),
            ));
        }
        Ok(self.locations.clone())
    }
}

/// 天气替身：current 为 None 时模拟「无当前天气」
#[derive(Debug, Default)]
pub struct FakeWeather {
    current: Option<CurrentConditions>,
    calls: Mutex<Vec<(f64, f64)>>,
}

impl FakeWeather {
    pub fn new(current: Option<CurrentConditions>) -> Self {
        Self {
            current,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn sunny() -> Self {
        Self::new(Some(CurrentConditions {
            time: "2024-05-01T12:00".to_string(),
            temperature: 21.5,
            precipitation: 0.0,
            windspeed: 8.3,
        }))
    }

    pub fn calls(&self) -> Vec<(f64, f64)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<WeatherReport>, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((latitude, longitude));
        }
        Ok(self.current.clone().map(|current| WeatherReport {
            latitude,
            longitude,
            timezone: "UTC".to_string(),
            current_units: None,
            current,
        }))
    }
}

/// 新闻替身：固定返回 report
#[derive(Debug, Default)]
pub struct FakeNews {
    report: Option<NewsReport>,
    queries: Mutex<Vec<NewsQuery>>,
}

impl FakeNews {
    pub fn new(report: NewsReport) -> Self {
        Self {
            report: Some(report),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(NewsReport {
            status: "ok".to_string(),
            total_results: 0,
            articles: Vec::new(),
            message: None,
        })
    }

    pub fn queries(&self) -> Vec<NewsQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NewsProvider for FakeNews {
    async fn search(&self, query: &NewsQuery) -> Result<NewsReport, AgentError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        self.report
            .clone()
            .ok_or_else(|| AgentError::Transport("news: no scripted report".to_string()))
    }
}
