//! 应用状态管理
//!
//! 定义在请求处理器之间共享的状态。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{Directory, LlmService, SessionStore};

/// 应用共享状态
///
/// 使用 Arc 包裹以便在多个处理器之间安全共享
pub struct AppState {
    /// 生成器（随配置刷新）
    pub llm: LlmService,
    /// 当前会话
    pub session: SessionStore,
    /// 学生/公司/活动目录
    pub directory: Directory,
}

impl AppState {
    pub fn new(llm: LlmService, session: SessionStore, directory: Directory) -> Self {
        Self {
            llm,
            session,
            directory,
        }
    }

    /// 按配置创建状态
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            LlmService::from_config(config),
            SessionStore::load_or_create(&config.session_path),
            Directory::seeded(),
        )
    }
}

/// 创建可共享的应用状态
pub fn create_shared_state(config: &AppConfig) -> Arc<AppState> {
    Arc::new(AppState::from_config(config))
}
