use serde::Serialize;
use ts_rs::TS;

use crate::models::assignments::entities::{
    Assignment, AssignmentKind, Question, QuestionOption, QuestionType,
};

/// 作答视图中的选项（学生不可见正确标记）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct OptionView {
    pub id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// 作答视图中的题目
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct QuestionView {
    pub id: i64,
    pub prompt: String,
    pub question_type: QuestionType,
    pub points: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub options: Vec<OptionView>,
}

/// 作业作答视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct AssignmentView {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentKind,
    pub max_score: f64,
    pub passing_score: Option<f64>,
    pub max_attempts: Option<i32>,
    pub allow_late_submit: bool,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_possible_score: i64,
    pub questions: Vec<QuestionView>,
}

impl OptionView {
    fn from_option(option: &QuestionOption, reveal_answers: bool) -> Self {
        Self {
            id: option.id,
            text: option.text.clone(),
            is_correct: reveal_answers.then_some(option.is_correct),
        }
    }
}

impl QuestionView {
    pub fn from_question(question: &Question, reveal_answers: bool) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt.clone(),
            question_type: question.question_type,
            points: question.points,
            explanation: if reveal_answers {
                question.explanation.clone()
            } else {
                None
            },
            options: question
                .options
                .iter()
                .map(|opt| OptionView::from_option(opt, reveal_answers))
                .collect(),
        }
    }
}

impl AssignmentView {
    /// 构建作答视图，`reveal_answers` 为 false 时隐藏正确答案与解析
    pub fn from_assignment(assignment: &Assignment, reveal_answers: bool) -> Self {
        Self {
            id: assignment.id,
            course_id: assignment.course_id,
            title: assignment.title.clone(),
            description: assignment.description.clone(),
            kind: assignment.kind,
            max_score: assignment.max_score,
            passing_score: assignment.passing_score,
            max_attempts: assignment.max_attempts,
            allow_late_submit: assignment.allow_late_submit,
            due_date: assignment.due_date,
            max_possible_score: assignment.max_possible_score(),
            questions: assignment
                .questions
                .iter()
                .map(|q| QuestionView::from_question(q, reveal_answers))
                .collect(),
        }
    }
}
