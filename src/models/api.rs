//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};

use super::user::{User, UserKind};

/// 模拟登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<UserKind>,
}

/// 模拟注册请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(rename = "type")]
    pub kind: UserKind,
}

/// 当前会话
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<User>,
}

/// 学生列表查询
#[derive(Debug, Default, Deserialize)]
pub struct StudentQuery {
    pub q: Option<String>,
    pub major: Option<String>,
    pub university: Option<String>,
    pub skill: Option<String>,
}

/// 公司列表查询
#[derive(Debug, Default, Deserialize)]
pub struct CompanyQuery {
    pub q: Option<String>,
    pub industry: Option<String>,
    pub specialty: Option<String>,
}

/// 活动列表查询
#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub company: Option<String>,
}

/// 列表响应
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

/// 筛选下拉框可选值
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetsResponse {
    pub majors: Vec<String>,
    pub universities: Vec<String>,
    pub skills: Vec<String>,
    pub industries: Vec<String>,
    pub specialties: Vec<String>,
    pub event_types: Vec<String>,
    pub event_companies: Vec<String>,
}
