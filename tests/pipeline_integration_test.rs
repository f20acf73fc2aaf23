//! 问询流水线集成测试：使用 Scripted LLM 与记录调用的提供方替身，跑完整条流水线

use std::sync::Arc;
use std::time::Duration;

use current_events::config::AppConfig;
use current_events::core::{AgentError, PipelinePhase, RecordingDelay};
use current_events::llm::{LlmError, Role, ScriptedLlmClient};
use current_events::pipeline::InquiryPipeline;
use current_events::providers::fake::{FakeGeocoder, FakeNews, FakeWeather};
use current_events::shell::{run_shell, FAREWELL};
use current_events::{build_pipeline, Collaborators};

const SCENARIO_A: &str = r#"{"thought":"user wants weather","action":{"action_name":"get_weather","parameters":{"city":"Paris","state_or_province":"","country":"France"}}}"#;
const SCENARIO_C: &str = r#"{"thought":"I can't help with that","action":null}"#;
const NEWS: &str = r#"{"thought":"user wants news","action":{"action_name":"get_news","parameters":{"topic":"rust"}}}"#;

struct Fixture {
    llm: Arc<ScriptedLlmClient>,
    geocoder: Arc<FakeGeocoder>,
    weather: Arc<FakeWeather>,
    news: Arc<FakeNews>,
    delay: Arc<RecordingDelay>,
    pipeline: InquiryPipeline,
}

fn fixture(llm: ScriptedLlmClient, geocoder: FakeGeocoder, weather: FakeWeather) -> Fixture {
    let llm = Arc::new(llm);
    let geocoder = Arc::new(geocoder);
    let weather = Arc::new(weather);
    let news = Arc::new(FakeNews::empty());
    let delay = Arc::new(RecordingDelay::new());
    let pipeline = build_pipeline(
        &AppConfig::default(),
        Collaborators {
            llm: llm.clone(),
            geocoder: geocoder.clone(),
            weather: weather.clone(),
            news: news.clone(),
            delay: delay.clone(),
        },
    );
    Fixture {
        llm,
        geocoder,
        weather,
        news,
        delay,
        pipeline,
    }
}

#[tokio::test]
async fn scenario_a_weather_inquiry() {
    let f = fixture(
        ScriptedLlmClient::new([SCENARIO_A, "It is 21.5°C and dry in Paris."]),
        FakeGeocoder::at("Paris", 48.85341, 2.3488),
        FakeWeather::sunny(),
    );

    let (result, trace) = f.pipeline.process_traced("What's the weather in Paris?").await;

    assert_eq!(result.unwrap(), "It is 21.5°C and dry in Paris.");
    assert_eq!(trace.attempts(), 1);
    assert_eq!(
        trace.phases(),
        &[
            PipelinePhase::Received,
            PipelinePhase::Resolving,
            PipelinePhase::Resolved,
            PipelinePhase::Dispatching,
            PipelinePhase::Dispatched,
            PipelinePhase::Synthesizing,
            PipelinePhase::Done,
        ]
    );
    assert_eq!(
        f.geocoder.calls(),
        vec![("Paris".to_string(), String::new(), "France".to_string())]
    );
    assert_eq!(f.weather.calls(), vec![(48.85341, 2.3488)]);
    assert!(f.news.queries().is_empty());
    assert_eq!(f.delay.count(), 0);

    let requests = f.llm.requests();
    assert_eq!(requests.len(), 2);
    let synthesis = &requests[1];
    assert_eq!(synthesis.len(), 1);
    assert_eq!(synthesis[0].role, Role::User);
    assert!(synthesis[0].content.contains("What's the weather in Paris?"));
    assert!(synthesis[0].content.contains("user wants weather"));
    assert!(synthesis[0].content.contains("'get_weather'"));
    assert!(synthesis[0].content.contains("21.5"));
}

#[tokio::test]
async fn scenario_b_resolution_exhausted() {
    let f = fixture(
        ScriptedLlmClient::always("not json"),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let (result, trace) = f.pipeline.process_traced("???").await;

    assert!(matches!(
        result,
        Err(AgentError::ResolutionFailed { attempts: 3 })
    ));
    assert_eq!(f.llm.call_count(), 3);
    assert_eq!(f.delay.waits(), vec![Duration::from_millis(1000); 2]);
    assert_eq!(trace.attempts(), 3);
    assert_eq!(trace.current(), Some(&PipelinePhase::ResolutionFailed));
    assert!(f.geocoder.calls().is_empty());
}

#[tokio::test]
async fn scenario_c_no_action_returns_thought() {
    let f = fixture(
        ScriptedLlmClient::new([SCENARIO_C]),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let (result, trace) = f.pipeline.process_traced("Write me a poem").await;

    assert_eq!(result.unwrap(), "I can't help with that");
    assert_eq!(f.llm.call_count(), 1);
    assert!(f.geocoder.calls().is_empty());
    assert!(f.weather.calls().is_empty());
    assert!(f.news.queries().is_empty());
    assert_eq!(
        trace.phases(),
        &[
            PipelinePhase::Received,
            PipelinePhase::Resolving,
            PipelinePhase::Resolved,
            PipelinePhase::Done,
        ]
    );
}

#[tokio::test]
async fn unknown_location_fails_without_weather_call() {
    let f = fixture(
        ScriptedLlmClient::new([SCENARIO_A]),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let (result, trace) = f.pipeline.process_traced("weather in Paris").await;

    assert!(matches!(result, Err(AgentError::NotFound(_))));
    assert!(f.weather.calls().is_empty());
    assert_eq!(f.llm.call_count(), 1);
    assert_eq!(trace.current(), Some(&PipelinePhase::DispatchFailed));
}

#[tokio::test]
async fn news_inquiry_with_empty_result_is_synthesized() {
    let f = fixture(
        ScriptedLlmClient::new([NEWS, "No popular Rust stories in the last day."]),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let answer = f.pipeline.process("rust news").await.unwrap();

    assert_eq!(answer, "No popular Rust stories in the last day.");
    assert_eq!(f.news.queries().len(), 1);
    assert_eq!(f.news.queries()[0].topic, "rust");
    assert!(f.geocoder.calls().is_empty());
}

#[tokio::test]
async fn synthesis_failure_is_terminal() {
    let f = fixture(
        ScriptedLlmClient::new([NEWS]).then_error(LlmError::Timeout(60)),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let (result, trace) = f.pipeline.process_traced("rust news").await;

    assert!(matches!(result, Err(AgentError::SynthesisFailed(_))));
    assert_eq!(f.llm.call_count(), 2);
    assert_eq!(trace.current(), Some(&PipelinePhase::SynthesisFailed));
}

#[tokio::test]
async fn shell_runs_until_quit_token() {
    let f = fixture(
        ScriptedLlmClient::new([SCENARIO_C]).then("not json").then("not json").then("not json"),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let input: &[u8] = b"tell me a joke\nbroken\nq\nnever read\n";
    let mut output = Vec::new();
    let handled = run_shell(&f.pipeline, "q", "Ask me:", input, &mut output)
        .await
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(handled, 2);
    assert!(output.contains("I can't help with that"));
    assert!(output.contains("Unable to fulfill user inquiry"));
    assert!(output.trim_end().ends_with(FAREWELL));
    assert_eq!(f.llm.call_count(), 4);
}

#[tokio::test]
async fn shell_stops_at_end_of_input() {
    let f = fixture(
        ScriptedLlmClient::offline(),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let input: &[u8] = b"";
    let mut output = Vec::new();
    let handled = run_shell(&f.pipeline, "q", "Ask me:", input, &mut output)
        .await
        .unwrap();

    assert_eq!(handled, 0);
    assert!(String::from_utf8(output).unwrap().contains(FAREWELL));
}

#[tokio::test]
async fn shell_quit_token_must_match_whole_line() {
    let f = fixture(
        ScriptedLlmClient::always(SCENARIO_C),
        FakeGeocoder::default(),
        FakeWeather::sunny(),
    );

    let input: &[u8] = b"  q \nq\n";
    let mut output = Vec::new();
    let handled = run_shell(&f.pipeline, "q", "Ask me:", input, &mut output)
        .await
        .unwrap();

    assert_eq!(handled, 1);
    assert_eq!(f.llm.call_count(), 1);
    assert!(String::from_utf8(output).unwrap().contains("I can't help with that"));
}

#[tokio::test]
async fn trace_reports_tokens_per_inquiry() {
    let f = fixture(
        ScriptedLlmClient::new([SCENARIO_A, "It is 21.5°C and dry in Paris.", SCENARIO_C])
            .with_usage_per_call(100, 20),
        FakeGeocoder::at("Paris", 48.85341, 2.3488),
        FakeWeather::sunny(),
    );

    let (result, trace) = f.pipeline.process_traced("What's the weather in Paris?").await;
    assert!(result.is_ok());
    assert_eq!(trace.tokens(), 240);

    let (result, trace) = f.pipeline.process_traced("Tell me a joke").await;
    assert_eq!(result.unwrap(), "I can't help with that");
    assert_eq!(trace.tokens(), 120);
}
