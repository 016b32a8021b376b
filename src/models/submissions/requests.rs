use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;
use crate::models::submissions::entities::SubmissionStatus;

/// 单题作答（按题型区分的标签联合）
///
/// ```json
/// { "type": "choice", "question_id": 1, "selected_options": [3, 4] }
/// { "type": "text", "question_id": 2, "text": "..." }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmittedAnswer {
    Choice {
        question_id: i64,
        #[serde(default)]
        selected_options: Vec<i64>,
    },
    Text {
        question_id: i64,
        text: String,
    },
}

impl SubmittedAnswer {
    pub fn question_id(&self) -> i64 {
        match self {
            SubmittedAnswer::Choice { question_id, .. } => *question_id,
            SubmittedAnswer::Text { question_id, .. } => *question_id,
        }
    }
}

/// 提交测验请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmitTestRequest {
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
    // 作答用时（秒）
    pub time_spent: Option<i32>,
}

/// 人工评分请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

/// 提交列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<SubmissionStatus>,
    pub user_id: Option<i64>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct SubmissionListQuery {
    pub assignment_id: i64,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<SubmissionStatus>,
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_answers_deserialize() {
        let answers: Vec<SubmittedAnswer> = serde_json::from_str(
            r#"[
                {"type": "choice", "question_id": 1, "selected_options": [3, 4]},
                {"type": "text", "question_id": 2, "text": "because"},
                {"type": "choice", "question_id": 5}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            answers[0],
            SubmittedAnswer::Choice {
                question_id: 1,
                selected_options: vec![3, 4]
            }
        );
        assert_eq!(answers[1].question_id(), 2);
        assert_eq!(
            answers[2],
            SubmittedAnswer::Choice {
                question_id: 5,
                selected_options: vec![]
            }
        );
    }

    #[test]
    fn test_untagged_answer_is_rejected() {
        let result = serde_json::from_str::<SubmittedAnswer>(r#"{"question_id": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_answers_default_to_empty() {
        let req: SubmitTestRequest = serde_json::from_str(r#"{"time_spent": 30}"#).unwrap();
        assert!(req.answers.is_empty());
        assert_eq!(req.time_spent, Some(30));
    }
}
