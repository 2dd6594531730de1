//! LLM 模块
//!
//! 提供 Gemini generateContent 客户端以及服务层使用的生成后端抽象。

mod backend;
mod client;
mod format;
mod types;

pub use backend::GenerationBackend;
pub use client::LlmClient;
pub use format::{build_generate_endpoint, strip_json_fences};
pub use types::{GenerateContentResponse, GenerationOptions, HarmBlockThreshold, HarmCategory, LlmError, SafetySetting};
