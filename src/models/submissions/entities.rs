use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionStatus {
    Pending, // 待人工批改
    Graded,  // 已评分（终态）
}

impl SubmissionStatus {
    pub const PENDING: &'static str = "pending";
    pub const GRADED: &'static str = "graded";
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: pending, graded"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "{}", SubmissionStatus::PENDING),
            SubmissionStatus::Graded => write!(f, "{}", SubmissionStatus::GRADED),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionStatus::PENDING => Ok(SubmissionStatus::Pending),
            SubmissionStatus::GRADED => Ok(SubmissionStatus::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 单题作答记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionAnswer {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    // 选中的选项 ID（主观题为空）
    pub selected_options: Vec<i64>,
    // 文本作答（仅主观题）
    pub text_answer: Option<String>,
    // 仅对客观题有意义
    pub is_correct: bool,
    // 得分，主观题在人工批改前为 0
    pub points: i32,
}

// 提交（一次尝试）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    // 第几次尝试，从 1 开始
    pub attempt_number: i32,
    pub status: SubmissionStatus,
    // 评分前为空
    pub score: Option<f64>,
    // 提交时作业满分的快照
    pub max_score: f64,
    pub feedback: Option<String>,
    pub is_late: bool,
    // 作答用时（秒）
    pub time_spent: Option<i32>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_by: Option<i64>,
    pub answers: Vec<SubmissionAnswer>,
}

/// 待写入的作答记录
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmissionAnswer {
    pub question_id: i64,
    pub selected_options: Vec<i64>,
    pub text_answer: Option<String>,
    pub is_correct: bool,
    pub points: i32,
}

/// 待写入的提交，尝试序号由存储层在事务内分配
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub user_id: i64,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub max_score: f64,
    pub is_late: bool,
    pub time_spent: Option<i32>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub answers: Vec<NewSubmissionAnswer>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }

    /// 各题得分之和
    pub fn answer_points_total(&self) -> i64 {
        self.answers.iter().map(|a| i64::from(a.points)).sum()
    }
}
