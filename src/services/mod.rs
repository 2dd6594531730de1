//! 服务层模块

pub mod directory;
mod llm_service;
pub mod opportunity;
pub mod session;

pub use directory::Directory;
pub use llm_service::LlmService;
pub use opportunity::OpportunityGenerator;
pub use session::{SessionError, SessionStore};
