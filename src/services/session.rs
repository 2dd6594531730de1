//! 会话存储
//!
//! 模拟登录状态。显式对象，通过共享状态传递；持久化为单个 JSON 文件，
//! 文件内容始终与最后一次成功写入一致。

use parking_lot::RwLock;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    CompanyProfile, LoginRequest, Profile, ProfileUpdate, SignupRequest, StudentProfile, User,
    UserKind,
};

/// 会话错误
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("账户信息无效: {0}")]
    InvalidAccount(String),

    #[error("两次输入的密码不一致")]
    PasswordMismatch,

    #[error("当前没有登录用户")]
    NotLoggedIn,

    #[error("档案类型不匹配: 当前用户为 {expected:?}")]
    ProfileKindMismatch { expected: UserKind },

    #[error("会话文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("会话序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 会话存储
pub struct SessionStore {
    path: PathBuf,
    user: RwLock<Option<User>>,
}

impl SessionStore {
    /// 读取已保存的会话；文件不存在或内容损坏时得到空会话
    pub fn load_or_create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let user = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<User>(&content) {
                Ok(user) => {
                    info!("Restored session: user_id={}", user.id);
                    Some(user)
                }
                Err(e) => {
                    warn!("Ignoring corrupt session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read session file {}: {}", path.display(), e);
                None
            }
        };

        Self {
            path,
            user: RwLock::new(user),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 获取当前用户（克隆）
    pub fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }

    /// 模拟登录：邮箱含 "company" 时视为公司账户，附带示例档案
    pub fn login(&self, req: LoginRequest) -> Result<User, SessionError> {
        let (email, local) = check_email(&req.email)?;

        let kind = req.kind.unwrap_or(if email.contains("company") {
            UserKind::Company
        } else {
            UserKind::Student
        });
        let name = req
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| capitalize(local));
        let profile = match kind {
            UserKind::Student => Profile::Student(StudentProfile::default()),
            UserKind::Company => Profile::Company(CompanyProfile::default()),
        };

        let user = self.start(new_user(name, email, kind, profile))?;
        info!("User logged in: user_id={}, kind={:?}", user.id, user.kind);
        Ok(user)
    }

    /// 模拟注册：两次密码必须一致，新账户带空白档案
    pub fn signup(&self, req: SignupRequest) -> Result<User, SessionError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidAccount("name is required".to_string()));
        }
        let (email, _) = check_email(&req.email)?;
        if req.password.is_empty() {
            return Err(SessionError::InvalidAccount("password is required".to_string()));
        }
        if req.password != req.confirm_password {
            return Err(SessionError::PasswordMismatch);
        }

        let profile = match req.kind {
            UserKind::Student => Profile::Student(StudentProfile::blank()),
            UserKind::Company => Profile::Company(CompanyProfile::blank()),
        };

        let user = self.start(new_user(name.to_string(), email, req.kind, profile))?;
        info!("User signed up: user_id={}, kind={:?}", user.id, user.kind);
        Ok(user)
    }

    /// 持久化后替换当前用户
    fn start(&self, user: User) -> Result<User, SessionError> {
        let mut guard = self.user.write();
        self.persist(&user)?;
        *guard = Some(user.clone());
        Ok(user)
    }

    /// 登出并删除持久化文件
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut guard = self.user.write();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if let Some(user) = guard.take() {
            info!("User logged out: user_id={}", user.id);
        }
        Ok(())
    }

    /// 合并部分档案更新，更新类型必须与用户类型一致
    pub fn update_profile(&self, update: ProfileUpdate) -> Result<User, SessionError> {
        let mut guard = self.user.write();
        let current = guard.as_ref().ok_or(SessionError::NotLoggedIn)?;
        if update.kind() != current.kind {
            return Err(SessionError::ProfileKindMismatch {
                expected: current.kind,
            });
        }

        let mut updated = current.clone();
        let profile = match (updated.profile.take(), update) {
            (Some(Profile::Student(mut p)), ProfileUpdate::Student(u)) => {
                p.apply(u);
                Profile::Student(p)
            }
            (None, ProfileUpdate::Student(u)) => {
                let mut p = StudentProfile::blank();
                p.apply(u);
                Profile::Student(p)
            }
            (Some(Profile::Company(mut p)), ProfileUpdate::Company(u)) => {
                p.apply(u);
                Profile::Company(p)
            }
            (None, ProfileUpdate::Company(u)) => {
                let mut p = CompanyProfile::blank();
                p.apply(u);
                Profile::Company(p)
            }
            // 档案形状与账户类型不符，保持原样
            (Some(_), _) => {
                return Err(SessionError::ProfileKindMismatch {
                    expected: current.kind,
                })
            }
        };
        updated.profile = Some(profile);

        self.persist(&updated)?;
        *guard = Some(updated.clone());
        info!("Profile updated: user_id={}", updated.id);
        Ok(updated)
    }

    fn persist(&self, user: &User) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// 校验邮箱格式，返回去空白后的邮箱和 `@` 前的部分
fn check_email(email: &str) -> Result<(&str, &str), SessionError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(SessionError::InvalidAccount("email must contain '@'".to_string()));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(SessionError::InvalidAccount("email is malformed".to_string()));
    }
    Ok((email, local))
}

fn new_user(name: String, email: &str, kind: UserKind, profile: Profile) -> User {
    User {
        id: Uuid::new_v4().simple().to_string()[..7].to_string(),
        name,
        email: email.to_string(),
        kind,
        profile: Some(profile),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
