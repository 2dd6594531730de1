//! 提示词构建
//!
//! 负责把推荐请求渲染成固定模板，以及把结构化学生档案整理成自由文本。

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::types::SuggestionRequest;
use crate::models::{Profile, User};

/// 模板开头的固定说明
const INSTRUCTIONS: &str = "You are an AI assistant designed to suggest relevant mentorships, events, and job opportunities to students based on their profile and activities.

Analyze the following student profile and recent activities to identify potential opportunities that the student might be interested in. Provide a list of opportunities that are highly relevant to the student's interests and background.";

/// 模板结尾的固定指令
const CLOSING: &str = "Based on this information, suggest opportunities to the student:";

/// 输出 schema：只有一个字符串数组字段
pub static OUTPUT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "opportunities": {
                "type": "ARRAY",
                "description": "A list of suggested mentorships, events, or job opportunities tailored to the student.",
                "items": { "type": "STRING" }
            }
        },
        "required": ["opportunities"]
    })
});

/// 渲染提示词，字段原样代入
pub fn render_prompt(request: &SuggestionRequest) -> String {
    format!(
        "{}\n\nStudent Profile:\n{}\n\nStudent Activities:\n{}\n\n{}\n",
        INSTRUCTIONS, request.student_profile, request.student_activities, CLOSING
    )
}

/// 把学生用户的档案整理成 studentProfile 文本
///
/// 空字段不输出；用户没有学生档案时只包含姓名。
pub fn summarize_student_profile(user: &User) -> String {
    let mut parts = vec![format!("Name: {}", user.name)];

    if let Some(Profile::Student(profile)) = &user.profile {
        if !profile.major.is_empty() || !profile.university.is_empty() {
            parts.push(format!(
                "Studying {} at {} (year {})",
                non_empty_or(&profile.major, "an undeclared major"),
                non_empty_or(&profile.university, "an unspecified university"),
                profile.year
            ));
        }
        push_list(&mut parts, "Skills", &profile.skills);
        push_list(&mut parts, "Interests", &profile.interests);
        push_list(&mut parts, "Achievements", &profile.achievements);
        if !profile.mentorship_preferences.trim().is_empty() {
            parts.push(format!(
                "Mentorship preferences: {}",
                profile.mentorship_preferences.trim()
            ));
        }
        if !profile.bio.trim().is_empty() {
            parts.push(format!("Bio: {}", profile.bio.trim()));
        }
    }

    parts.join("\n")
}

fn push_list(parts: &mut Vec<String>, label: &str, items: &[String]) {
    if !items.is_empty() {
        parts.push(format!("{}: {}", label, items.join(", ")));
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
