//! 提示模板：系统指令、解析提示、合成提示

use crate::actions::{ActionCatalog, ThoughtAndAction};
use crate::providers::ExternalResult;

/// 解析阶段的系统指令
pub const SYSTEM_PROMPT: &str = "\
You are an AI reasoning engine that determines structured actions based on user input. \
Follow these rules when responding:
- Always return output in JSON format.
- If no valid action exists, return `null` for the `\"action\"` property of the JSON payload. \
Your reasoning should only mention the nature of the user's inquiry and why no action is available, \
without referencing missing parameters for unrelated actions.
- Your job is to pick the appropriate action, not to execute it.
- Pick exactly one action: the one most relevant to the user's inquiry.
- Keep your reasoning concise but clear.
- Only respond with the JSON object.
    - Do NOT include markdown formatting such as triple backticks (```) or \"json\" syntax highlighting.
    - The response must start directly with `{` and end with `}`.
    - The response must be fully valid JSON.
    - Use EXACTLY the parameters outlined in the action structure. Do not add, remove, or rename parameters.";

/// 解析提示：嵌入动作目录、输出 Schema 与用户原文
pub fn resolution_prompt(catalog: &ActionCatalog, schema: &str, user_input: &str) -> String {
    format!(
        "Analyze the following user request and determine the next action that should be taken to fulfill their inquiry. \
The available actions are as follows:
{actions}

The user's input is as follows:
{user_input}

Please return a JSON object following this schema:
{{
  \"thought\": \"<your reasoning>\",
  \"action\": {{
    \"action_name\": \"<chosen_action_name>\",
    \"parameters\": {{
      \"<param1_name>\": \"<param1_value>\",
      ...
    }}
  }}
}}

The full JSON Schema of a valid response is:
{schema}

For the `thought`, describe your reasoning about the user's request and the action you determined would be most appropriate.
If the user's request does not match any of the available actions, set `\"action\": null`. \
Your reasoning should explain that the inquiry is unsupported while staying relevant to the topic requested. \
Do not assume missing parameters for unrelated actions.",
        actions = catalog.render(),
    )
}

/// 合成提示：原始问询、思考、调用的动作与参数、外部结果
pub fn synthesis_prompt(
    user_inquiry: &str,
    thought_and_action: &ThoughtAndAction,
    result: &ExternalResult,
) -> String {
    let (action_name, parameters) = match &thought_and_action.action {
        Some(action) => (action.name().to_string(), action.parameters_json()),
        None => ("none".to_string(), "{}".to_string()),
    };
    format!(
        "The user has made the following inquiry:
{user_inquiry}

From this inquiry, we concluded the following:
{thought}

We invoked the available action '{action_name}' using the following parameters:
{parameters}

We then received the following results:
{results}

Please provide the user with a conclusive analysis of the results of their inquiry.",
        thought = thought_and_action.thought,
        results = result.to_json(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, NewsParameters};
    use crate::providers::NewsReport;

    #[test]
    fn test_resolution_prompt_embeds_catalog_and_input() {
        let prompt = resolution_prompt(&ActionCatalog::new(), "{}", "weather in Lima?");
        assert!(prompt.contains("<the_requested_city>"));
        assert!(prompt.contains("weather in Lima?"));
        assert!(prompt.contains("\"action\": null"));
    }

    #[test]
    fn test_synthesis_prompt_embeds_everything() {
        let ta = ThoughtAndAction::with_action(
            "user wants rust news",
            Action::GetNews(NewsParameters { topic: "rust".into() }),
        );
        let result = ExternalResult::News(NewsReport {
            status: "ok".into(),
            total_results: 0,
            articles: vec![],
            message: None,
        });
        let prompt = synthesis_prompt("any rust news?", &ta, &result);
        assert!(prompt.contains("any rust news?"));
        assert!(prompt.contains("user wants rust news"));
        assert!(prompt.contains("'get_news'"));
        assert!(prompt.contains(r#"{"topic":"rust"}"#));
        assert!(prompt.contains(r#""articles":[]"#));
    }
}
