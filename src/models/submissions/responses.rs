use serde::Serialize;
use ts_rs::TS;

use crate::models::submissions::entities::{Submission, SubmissionStatus};

/// 提交测验响应
///
/// 提交状态为 pending 时 `score` 为空，`percentage`/`passed` 仅反映客观题部分。
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmitTestResponse {
    pub submission: Submission,
    pub score: Option<i64>,
    pub max_score: i64,
    pub percentage: f64,
    pub passed: bool,
    pub attempt_number: i32,
}

/// 单题参考答案（允许查看时附带）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct AnswerKeyItem {
    pub question_id: i64,
    pub correct_options: Vec<i64>,
    pub max_points: i32,
    pub explanation: Option<String>,
}

/// 提交详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionDetail {
    pub submission: Submission,
    pub assignment_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<Vec<AnswerKeyItem>>,
}

/// 提交列表项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListItem {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub attempt_number: i32,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub max_score: f64,
    pub is_late: bool,
    pub submitted_at: String,
    pub graded_at: Option<String>,
}

impl From<&Submission> for SubmissionListItem {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id,
            assignment_id: s.assignment_id,
            user_id: s.user_id,
            attempt_number: s.attempt_number,
            status: s.status,
            score: s.score,
            max_score: s.max_score,
            is_late: s.is_late,
            submitted_at: s.submitted_at.to_rfc3339(),
            graded_at: s.graded_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// 用户提交历史响应（无分页）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct UserSubmissionHistoryResponse {
    pub items: Vec<SubmissionListItem>,
    pub attempts_used: i64,
    pub max_attempts: Option<i32>,
}
