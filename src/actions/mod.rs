//! 动作层：动作目录、动作/思考数据模型、输出 Schema

pub mod catalog;
pub mod model;
pub mod schema;

pub use catalog::{catalog, list_actions, ActionCatalog, ActionDescriptor};
pub use model::{Action, ActionName, NewsParameters, ThoughtAndAction, WeatherParameters};
pub use schema::thought_and_action_schema_json;
