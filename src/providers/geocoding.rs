//! Open-Meteo 地理编码：城市 / 省州 / 国家 -> 经纬度

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::actions::WeatherParameters;
use crate::core::AgentError;
use crate::providers::get_json;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// 地理编码结果（取第一条）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// 无匹配时 Open-Meteo 不返回 results 字段
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeoLocation>,
}

/// 地理编码提供方：返回按相关度排序的候选位置，空列表表示未找到
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn lookup(&self, location: &WeatherParameters) -> Result<Vec<GeoLocation>, AgentError>;
}

pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn query(location: &WeatherParameters) -> Vec<(&'static str, String)> {
        vec![
            ("name", location.city.clone()),
            ("country", location.country.clone()),
            ("admin1", location.state_or_province.clone()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ]
    }
}

#[async_trait]
impl GeocodingProvider for OpenMeteoGeocoder {
    async fn lookup(&self, location: &WeatherParameters) -> Result<Vec<GeoLocation>, AgentError> {
        let response: GeocodingResponse =
            get_json(&self.client, "geocoding", &self.base_url, &Self::query(location)).await?;
        Ok(response.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let params = WeatherParameters {
            city: "Springfield".into(),
            state_or_province: "Illinois".into(),
            country: "United States".into(),
        };
        let query = OpenMeteoGeocoder::query(&params);
        assert_eq!(query[0], ("name", "Springfield".to_string()));
        assert!(query.contains(&("admin1", "Illinois".to_string())));
        assert!(query.contains(&("count", "1".to_string())));
    }

    #[test]
    fn test_decode_without_results() {
        let response: GeocodingResponse =
            serde_json::from_str(r#"{"generationtime_ms":0.5}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_decode_results() {
        let raw = r#"{"results":[{"id":2988507,"name":"Paris","latitude":48.85341,"longitude":2.3488,"country":"France"}],"generationtime_ms":1.2}"#;
        let response: GeocodingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.results[0].name, "Paris");
        assert!((response.results[0].latitude - 48.85341).abs() < 1e-9);
    }
}
