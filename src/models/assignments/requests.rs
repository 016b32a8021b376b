use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use crate::models::assignments::entities::{AssignmentKind, QuestionType};

/// 创建选项请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct CreateOptionRequest {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 创建题目请求（题目顺序即数组顺序）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct CreateQuestionRequest {
    pub prompt: String,
    pub question_type: QuestionType,
    pub points: i32,
    pub explanation: Option<String>,
    #[serde(default)]
    pub options: Vec<CreateOptionRequest>,
}

/// 创建作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentKind,
    pub max_score: f64,
    pub passing_score: Option<f64>,
    pub max_attempts: Option<i32>,
    pub allow_late_submit: Option<bool>,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub auto_grade: Option<bool>,
    pub shuffle_questions: Option<bool>,
    pub show_correct_answers: Option<bool>,
    #[serde(default)]
    pub questions: Vec<CreateQuestionRequest>,
}
