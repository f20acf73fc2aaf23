//! 动作目录：进程级、只读的可调用动作清单
//!
//! 每个描述符给出动作名与参数占位符，仅用于渲染进解析提示；顺序即插入顺序。

use std::sync::OnceLock;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::actions::ActionName;

/// 动作描述：名称 + 有序的参数名/占位符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub action_name: ActionName,
    pub parameters: Vec<(&'static str, &'static str)>,
}

/// 参数按声明顺序输出（serde_json::Map 默认会按键排序）
struct OrderedParameters<'a>(&'a [(&'static str, &'static str)]);

impl Serialize for OrderedParameters<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, placeholder) in self.0 {
            map.serialize_entry(name, placeholder)?;
        }
        map.end()
    }
}

impl Serialize for ActionDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ActionDescriptor", 2)?;
        s.serialize_field("action_name", &self.action_name)?;
        s.serialize_field("parameters", &OrderedParameters(&self.parameters))?;
        s.end()
    }
}

static CATALOG: OnceLock<ActionCatalog> = OnceLock::new();

/// 进程级目录（首次访问时创建，之后只读）
pub fn catalog() -> &'static ActionCatalog {
    CATALOG.get_or_init(ActionCatalog::new)
}

/// 全局目录中的动作列表
pub fn list_actions() -> &'static [ActionDescriptor] {
    catalog().list_actions()
}

/// 只读动作目录
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    actions: Vec<ActionDescriptor>,
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self {
            actions: vec![
                ActionDescriptor {
                    action_name: ActionName::GetWeather,
                    parameters: vec![
                        ("city", "<the_requested_city>"),
                        ("state_or_province", "<the_requested_state_or_province>"),
                        ("country", "<the_requested_country>"),
                    ],
                },
                ActionDescriptor {
                    action_name: ActionName::GetNews,
                    parameters: vec![("topic", "<the_requested_topic>")],
                },
            ],
        }
    }

    pub fn list_actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    /// 渲染为缩进 JSON 数组，拼入解析提示
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.actions).unwrap_or_else(|_| "[]".to_string())
    }
}
