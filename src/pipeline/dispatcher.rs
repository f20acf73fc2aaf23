//! ActionDispatcher：按动作变体路由到唯一的处理器
//!
//! 无动作 -> NoAction（thought 原样作为最终回复，跳过合成）；
//! 有动作 -> PendingDispatch -> 穷尽匹配两种变体 -> Dispatched(结果) 或 Err（DispatchFailed）。
//! 新增动作变体时，这里的 match 会在编译期报错。

use std::sync::Arc;

use crate::actions::{Action, NewsParameters, ThoughtAndAction, WeatherParameters};
use crate::core::{AgentError, DispatchState};
use crate::providers::{
    ExternalResult, GeocodingProvider, NewsProvider, NewsQuery, WeatherProvider,
    news::{DEFAULT_LOOKBACK_HOURS, DEFAULT_PAGE_SIZE},
};

/// 分发的终止结果
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// 没有可执行动作，携带 thought
    NoAction(String),
    Dispatched(ExternalResult),
}

impl DispatchOutcome {
    pub fn state(&self) -> DispatchState {
        match self {
            DispatchOutcome::NoAction(_) => DispatchState::NoAction,
            DispatchOutcome::Dispatched(_) => DispatchState::Dispatched,
        }
    }
}

pub struct ActionDispatcher {
    geocoder: Arc<dyn GeocodingProvider>,
    weather: Arc<dyn WeatherProvider>,
    news: Arc<dyn NewsProvider>,
    news_lookback_hours: i64,
    news_limit: usize,
}

impl ActionDispatcher {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            news,
            news_lookback_hours: DEFAULT_LOOKBACK_HOURS,
            news_limit: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_news_window(mut self, lookback_hours: i64, limit: usize) -> Self {
        self.news_lookback_hours = lookback_hours;
        self.news_limit = limit;
        self
    }

    pub async fn dispatch(
        &self,
        thought_and_action: &ThoughtAndAction,
    ) -> Result<DispatchOutcome, AgentError> {
        let Some(action) = &thought_and_action.action else {
            tracing::info!(state = ?DispatchState::NoAction, "no applicable action");
            return Ok(DispatchOutcome::NoAction(thought_and_action.thought.clone()));
        };

        tracing::info!(state = ?DispatchState::PendingDispatch, action = %action.name(), "dispatching");
        let result = match action {
            Action::GetWeather(params) => self.get_weather(params).await,
            Action::GetNews(params) => self.get_news(params).await,
        };

        match result {
            Ok(result) => {
                tracing::info!(state = ?DispatchState::Dispatched, action = %action.name(), "dispatched");
                Ok(DispatchOutcome::Dispatched(result))
            }
            Err(err) => {
                tracing::error!(state = ?DispatchState::DispatchFailed, action = %action.name(), error = %err, "dispatch failed");
                Err(err)
            }
        }
    }

    async fn get_weather(&self, params: &WeatherParameters) -> Result<ExternalResult, AgentError> {
        let location = self
            .geocoder
            .lookup(params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AgentError::NotFound(format!(
                    "no location for '{},{},{}'",
                    params.city, params.state_or_province, params.country
                ))
            })?;

        tracing::debug!(name = %location.name, lat = location.latitude, lon = location.longitude, "geocoded");

        let report = self
            .weather
            .current(location.latitude, location.longitude)
            .await?
            .ok_or_else(|| {
                AgentError::NotFound(format!(
                    "no current conditions for '{}' lat/'{}' lon",
                    location.latitude, location.longitude
                ))
            })?;

        Ok(ExternalResult::Weather(report))
    }

    async fn get_news(&self, params: &NewsParameters) -> Result<ExternalResult, AgentError> {
        let query = NewsQuery::recent(params.topic.clone())
            .with_lookback_hours(self.news_lookback_hours)
            .with_limit(self.news_limit);
        let report = self.news.search(&query).await?;
        Ok(ExternalResult::News(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::fake::{FakeGeocoder, FakeNews, FakeWeather};
    use crate::providers::{NewsArticle, NewsReport, NewsSource};

    struct Harness {
        geocoder: Arc<FakeGeocoder>,
        weather: Arc<FakeWeather>,
        news: Arc<FakeNews>,
    }

    impl Harness {
        fn new(geocoder: FakeGeocoder, weather: FakeWeather, news: FakeNews) -> Self {
            Self {
                geocoder: Arc::new(geocoder),
                weather: Arc::new(weather),
                news: Arc::new(news),
            }
        }

        fn dispatcher(&self) -> ActionDispatcher {
            ActionDispatcher::new(
                self.geocoder.clone(),
                self.weather.clone(),
                self.news.clone(),
            )
        }
    }

    fn weather_action(city: &str) -> ThoughtAndAction {
        ThoughtAndAction::with_action(
            "user wants weather",
            Action::GetWeather(WeatherParameters {
                city: city.into(),
                state_or_province: "".into(),
                country: "France".into(),
            }),
        )
    }

    fn news_action(topic: &str) -> ThoughtAndAction {
        ThoughtAndAction::with_action(
            "user wants news",
            Action::GetNews(NewsParameters { topic: topic.into() }),
        )
    }

    #[tokio::test]
    async fn test_no_action_returns_thought() {
        let h = Harness::new(FakeGeocoder::default(), FakeWeather::sunny(), FakeNews::empty());
        let outcome = h
            .dispatcher()
            .dispatch(&ThoughtAndAction::no_action("I can't help with that"))
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::NoAction("I can't help with that".into()));
        assert_eq!(outcome.state(), DispatchState::NoAction);
        assert!(h.geocoder.calls().is_empty());
        assert!(h.news.queries().is_empty());
    }

    #[tokio::test]
    async fn test_weather_routes_geocoding_then_weather() {
        let h = Harness::new(
            FakeGeocoder::at("Paris", 48.85, 2.35),
            FakeWeather::sunny(),
            FakeNews::empty(),
        );
        let outcome = h.dispatcher().dispatch(&weather_action("Paris")).await.unwrap();

        assert_eq!(outcome.state(), DispatchState::Dispatched);
        assert_eq!(
            h.geocoder.calls(),
            vec![("Paris".to_string(), "".to_string(), "France".to_string())]
        );
        assert_eq!(h.weather.calls(), vec![(48.85, 2.35)]);
        assert!(h.news.queries().is_empty());
        assert!(matches!(outcome, DispatchOutcome::Dispatched(ExternalResult::Weather(_))));
    }

    #[tokio::test]
    async fn test_empty_geocoding_skips_weather() {
        let h = Harness::new(FakeGeocoder::default(), FakeWeather::sunny(), FakeNews::empty());
        let err = h.dispatcher().dispatch(&weather_action("Atlantis")).await.unwrap_err();
        assert!(matches!(err, AgentError::NotFound(msg) if msg.contains("Atlantis")));
        assert!(h.weather.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_conditions_not_found() {
        let h = Harness::new(
            FakeGeocoder::at("Paris", 48.85, 2.35),
            FakeWeather::new(None),
            FakeNews::empty(),
        );
        let err = h.dispatcher().dispatch(&weather_action("Paris")).await.unwrap_err();
        assert!(matches!(err, AgentError::NotFound(_)));
        assert_eq!(h.weather.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_news_routes_only_to_news() {
        let report = NewsReport {
            status: "ok".into(),
            total_results: 1,
            articles: vec![NewsArticle {
                source: NewsSource { id: None, name: "Wire".into() },
                author: None,
                title: Some("Launch".into()),
                description: Some("A rocket launched".into()),
                url: "https://example.com/launch".into(),
                url_to_image: None,
                published_at: "2024-05-01T06:00:00Z".into(),
                content: Some("...".into()),
            }],
            message: None,
        };
        let h = Harness::new(FakeGeocoder::default(), FakeWeather::sunny(), FakeNews::new(report));
        let outcome = h.dispatcher().dispatch(&news_action("space")).await.unwrap();

        assert!(h.geocoder.calls().is_empty());
        assert!(h.weather.calls().is_empty());
        assert_eq!(h.news.queries(), vec![NewsQuery::recent("space")]);
        match outcome {
            DispatchOutcome::Dispatched(ExternalResult::News(report)) => {
                assert_eq!(report.articles.len(), 1)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_news_is_not_an_error() {
        let h = Harness::new(FakeGeocoder::default(), FakeWeather::sunny(), FakeNews::empty());
        let outcome = h.dispatcher().dispatch(&news_action("nothing")).await.unwrap();
        assert_eq!(outcome.state(), DispatchState::Dispatched);
    }

    #[tokio::test]
    async fn test_news_window_is_configurable() {
        let h = Harness::new(FakeGeocoder::default(), FakeWeather::sunny(), FakeNews::empty());
        h.dispatcher()
            .with_news_window(48, 2)
            .dispatch(&news_action("rust"))
            .await
            .unwrap();
        let query = &h.news.queries()[0];
        assert_eq!(query.lookback_hours, 48);
        assert_eq!(query.limit, 2);
    }
}
