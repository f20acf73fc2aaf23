//! 动作数据模型：封闭的动作名枚举、带参数的动作标签联合、ThoughtAndAction
//!
//! Action 以 `action_name` 为判别字段、`parameters` 为内容（serde 相邻标签）；
//! 参数结构一律 deny_unknown_fields，未知动作名、缺失或多余参数都会在反序列化时失败，
//! 不会得到部分填充的值。

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::AgentError;

/// 支持的动作名（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    GetWeather,
    GetNews,
}

impl ActionName {
    pub const ALL: [ActionName; 2] = [ActionName::GetWeather, ActionName::GetNews];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::GetWeather => "get_weather",
            ActionName::GetNews => "get_news",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| AgentError::UnknownAction(s.to_string()))
    }
}

/// get_weather 参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WeatherParameters {
    pub city: String,
    /// 可为空字符串（如 Paris, France）
    pub state_or_province: String,
    pub country: String,
}

/// get_news 参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NewsParameters {
    pub topic: String,
}

/// 可执行的动作：`{"action_name": "...", "parameters": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(
    tag = "action_name",
    content = "parameters",
    rename_all = "snake_case",
    deny_unknown_fields
)]
pub enum Action {
    GetWeather(WeatherParameters),
    GetNews(NewsParameters),
}

impl Action {
    pub fn name(&self) -> ActionName {
        match self {
            Action::GetWeather(_) => ActionName::GetWeather,
            Action::GetNews(_) => ActionName::GetNews,
        }
    }

    /// 参数部分的 JSON（用于合成提示）
    pub fn parameters_json(&self) -> String {
        let value = match self {
            Action::GetWeather(p) => serde_json::to_value(p),
            Action::GetNews(p) => serde_json::to_value(p),
        };
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    /// 结构之外的取值约束：city / country / topic 不能为空白
    pub fn validate(&self) -> Result<(), AgentError> {
        let blank = |field: &str, value: &str| {
            if value.trim().is_empty() {
                Err(AgentError::Validation(format!(
                    "{}: parameter '{}' must not be empty",
                    self.name(),
                    field
                )))
            } else {
                Ok(())
            }
        };
        match self {
            Action::GetWeather(p) => {
                blank("city", &p.city)?;
                blank("country", &p.country)
            }
            Action::GetNews(p) => blank("topic", &p.topic),
        }
    }
}

/// LLM 对用户请求的思考与（可选）动作；action 为 null 表示没有适用的动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ThoughtAndAction {
    pub thought: String,
    /// 必须显式给出（null 或动作对象），缺省不会被当作 null
    #[serde(deserialize_with = "required_nullable")]
    #[schemars(with = "Option<Action>")]
    pub action: Option<Action>,
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<Action>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Action>::deserialize(deserializer)
}

impl ThoughtAndAction {
    pub fn no_action(thought: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            action: None,
        }
    }

    pub fn with_action(thought: impl Into<String>, action: Action) -> Self {
        Self {
            thought: thought.into(),
            action: Some(action),
        }
    }

    /// 严格解析 LLM 原始输出：必须是纯 JSON 对象（不接受 Markdown 包裹或数组），并通过取值校验
    pub fn parse(raw: &str) -> Result<Self, AgentError> {
        let raw = raw.trim();
        let value: Value =
            serde_json::from_str(raw).map_err(|e| AgentError::Validation(e.to_string()))?;
        require_objects(&value)?;

        // 结构已确认后再按类型解码原文，重复键等问题仍由 serde 报出
        let parsed: ThoughtAndAction =
            serde_json::from_str(raw).map_err(|e| diagnose(&value, e))?;
        match &parsed.action {
            Some(action) => action.validate()?,
            None if parsed.thought.trim().is_empty() => {
                return Err(AgentError::Validation(
                    "thought must not be empty when action is null".to_string(),
                ))
            }
            None => {}
        }
        Ok(parsed)
    }

    pub fn to_json(&self) -> Result<String, AgentError> {
        serde_json::to_string(self).map_err(|e| AgentError::Validation(e.to_string()))
    }
}

/// serde 派生的结构体与相邻标签枚举也接受 JSON 数组（按位置取字段）；
/// 顶层、非 null 的 action 及其 parameters 都必须是对象
fn require_objects(value: &Value) -> Result<(), AgentError> {
    let not_object = |what: &str| AgentError::Validation(format!("{what} must be a JSON object"));

    let top = value.as_object().ok_or_else(|| not_object("response"))?;
    let action = match top.get("action") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Object(action)) => action,
        Some(_) => return Err(not_object("action")),
    };
    match action.get("parameters") {
        Some(parameters) if !parameters.is_object() => Err(not_object("parameters")),
        _ => Ok(()),
    }
}

/// 为解析失败给出更具体的原因：动作名不在目录中时单独指出
fn diagnose(value: &Value, err: serde_json::Error) -> AgentError {
    let unknown = value
        .get("action")
        .and_then(|action| action.get("action_name"))
        .and_then(Value::as_str)
        .and_then(|name| name.parse::<ActionName>().err());
    match unknown {
        Some(unknown) => AgentError::Validation(unknown.to_string()),
        None => AgentError::Validation(err.to_string()),
    }
}
