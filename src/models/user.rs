//! 用户与档案模型
//!
//! 字段名与前端保持一致（camelCase，用户类型字段为 `type`）。

use serde::{Deserialize, Serialize};

/// 账户类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Student,
    Company,
}

/// 当前登录用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: UserKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// 学生或公司档案
///
/// 通过字段区分：学生档案带 `university`，公司档案带 `industry`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    Student(StudentProfile),
    Company(CompanyProfile),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub university: String,
    pub major: String,
    pub year: u32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub mentorship_preferences: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bio: String,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            university: "Tech University".to_string(),
            major: "Computer Science".to_string(),
            year: 3,
            skills: vec!["React".to_string(), "Node.js".to_string()],
            interests: vec!["AI".to_string(), "Web Dev".to_string()],
            achievements: vec!["Dean's List".to_string()],
            mentorship_preferences: "AI field".to_string(),
            bio: String::new(),
        }
    }
}

impl StudentProfile {
    /// 新注册账户的空白档案
    pub fn blank() -> Self {
        Self {
            university: String::new(),
            major: String::new(),
            year: 1,
            skills: Vec::new(),
            interests: Vec::new(),
            achievements: Vec::new(),
            mentorship_preferences: String::new(),
            bio: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub industry: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mentorship_specialties: Vec<String>,
    #[serde(default)]
    pub job_opportunities: Vec<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            industry: "Technology".to_string(),
            description: "A leading tech company.".to_string(),
            mentorship_specialties: vec!["Software Engineering".to_string()],
            job_opportunities: vec!["Internships available".to_string()],
        }
    }
}

impl CompanyProfile {
    pub fn blank() -> Self {
        Self {
            industry: String::new(),
            description: String::new(),
            mentorship_specialties: Vec::new(),
            job_opportunities: Vec::new(),
        }
    }
}

/// 学生档案的部分更新
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileUpdate {
    pub university: Option<String>,
    pub major: Option<String>,
    pub year: Option<u32>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
    pub mentorship_preferences: Option<String>,
    pub bio: Option<String>,
}

/// 公司档案的部分更新
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileUpdate {
    pub industry: Option<String>,
    pub description: Option<String>,
    pub mentorship_specialties: Option<Vec<String>>,
    pub job_opportunities: Option<Vec<String>>,
}

/// 档案更新请求，按 `type` 区分
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProfileUpdate {
    Student(StudentProfileUpdate),
    Company(CompanyProfileUpdate),
}

impl ProfileUpdate {
    pub fn kind(&self) -> UserKind {
        match self {
            ProfileUpdate::Student(_) => UserKind::Student,
            ProfileUpdate::Company(_) => UserKind::Company,
        }
    }
}

impl StudentProfile {
    pub fn apply(&mut self, update: StudentProfileUpdate) {
        if let Some(v) = update.university {
            self.university = v;
        }
        if let Some(v) = update.major {
            self.major = v;
        }
        if let Some(v) = update.year {
            self.year = v;
        }
        if let Some(v) = update.skills {
            self.skills = clean_list(v);
        }
        if let Some(v) = update.interests {
            self.interests = clean_list(v);
        }
        if let Some(v) = update.achievements {
            self.achievements = clean_list(v);
        }
        if let Some(v) = update.mentorship_preferences {
            self.mentorship_preferences = v;
        }
        if let Some(v) = update.bio {
            self.bio = v;
        }
    }
}

impl CompanyProfile {
    pub fn apply(&mut self, update: CompanyProfileUpdate) {
        if let Some(v) = update.industry {
            self.industry = v;
        }
        if let Some(v) = update.description {
            self.description = v;
        }
        if let Some(v) = update.mentorship_specialties {
            self.mentorship_specialties = clean_list(v);
        }
        if let Some(v) = update.job_opportunities {
            self.job_opportunities = clean_list(v);
        }
    }
}

/// 去掉列表项两端空白并丢弃空项
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
