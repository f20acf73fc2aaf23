//! 核心层：错误类型、流水线状态、可注入的重试等待

pub mod delay;
pub mod error;
pub mod state;

pub use delay::{Delay, RecordingDelay, TokioDelay};
pub use error::AgentError;
pub use state::{DispatchState, PipelinePhase, PipelineTrace};
