//! ThoughtAndAction 的 JSON Schema（schemars 自动生成）
//!
//! 拼入解析提示，减少 LLM 输出结构错误。

use schemars::schema_for;

use crate::actions::ThoughtAndAction;

/// 返回 ThoughtAndAction 的 JSON Schema 字符串
pub fn thought_and_action_schema_json() -> String {
    let schema = schema_for!(ThoughtAndAction);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| String::new())
}
