//! Open-Meteo 天气：经纬度 -> 当前气温、降水、风速（UTC）

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::AgentError;
use crate::providers::get_json;

pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,precipitation,windspeed_10m";

/// 当前天气各字段的单位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUnits {
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature: String,
    pub precipitation: String,
    #[serde(rename = "windspeed_10m")]
    pub windspeed: String,
}

/// 当前天气
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    pub precipitation: f64,
    #[serde(rename = "windspeed_10m")]
    pub windspeed: f64,
}

/// 天气结果：仅在存在当前天气时构造
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub current_units: Option<CurrentUnits>,
    pub current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timezone: String,
    current_units: Option<CurrentUnits>,
    current: Option<CurrentConditions>,
}

impl ForecastResponse {
    fn into_report(self) -> Option<WeatherReport> {
        let current = self.current?;
        Some(WeatherReport {
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
            current_units: self.current_units,
            current,
        })
    }
}

/// 天气提供方：无当前天气时返回 None
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, latitude: f64, longitude: f64)
        -> Result<Option<WeatherReport>, AgentError>;
}

pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn query(latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", "UTC".to_string()),
        ]
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeather {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<WeatherReport>, AgentError> {
        let response: ForecastResponse = get_json(
            &self.client,
            "weather",
            &self.base_url,
            &Self::query(latitude, longitude),
        )
        .await?;
        Ok(response.into_report())
    }
}
