//! 机会推荐服务
//!
//! 接收学生档案与活动摘要，经固定模板和安全阈值调用生成后端，
//! 校验输出后返回推荐列表。

mod generator;
mod prompt;
mod safety;
mod types;

pub use generator::OpportunityGenerator;
pub use prompt::{render_prompt, summarize_student_profile, OUTPUT_SCHEMA};
pub use safety::SAFETY_SETTINGS;
pub use types::{required_text, OpportunityError, SuggestionRequest, SuggestionResponse};
