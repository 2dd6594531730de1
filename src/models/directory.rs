//! 学生、公司、活动目录条目

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub university: String,
    pub major: String,
    pub year: u32,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub description: String,
    pub logo_url: String,
    pub specialties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub company: String,
    pub company_id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: String,
    pub description: String,
}
