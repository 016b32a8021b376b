use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "assignment.ts")]
pub enum AssignmentKind {
    Practical, // 实践
    Project,   // 项目
    Test,      // 测验
    Quiz,      // 小测
    Essay,     // 论文
}

impl AssignmentKind {
    pub const PRACTICAL: &'static str = "practical";
    pub const PROJECT: &'static str = "project";
    pub const TEST: &'static str = "test";
    pub const QUIZ: &'static str = "quiz";
    pub const ESSAY: &'static str = "essay";

    /// 是否支持结构化答题与自动评分
    pub fn supports_structured_grading(&self) -> bool {
        matches!(self, AssignmentKind::Test | AssignmentKind::Quiz)
    }
}

impl<'de> Deserialize<'de> for AssignmentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作业类型: '{s}'. 支持的类型: practical, project, test, quiz, essay"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentKind::Practical => write!(f, "{}", AssignmentKind::PRACTICAL),
            AssignmentKind::Project => write!(f, "{}", AssignmentKind::PROJECT),
            AssignmentKind::Test => write!(f, "{}", AssignmentKind::TEST),
            AssignmentKind::Quiz => write!(f, "{}", AssignmentKind::QUIZ),
            AssignmentKind::Essay => write!(f, "{}", AssignmentKind::ESSAY),
        }
    }
}

impl std::str::FromStr for AssignmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AssignmentKind::PRACTICAL => Ok(AssignmentKind::Practical),
            AssignmentKind::PROJECT => Ok(AssignmentKind::Project),
            AssignmentKind::TEST => Ok(AssignmentKind::Test),
            AssignmentKind::QUIZ => Ok(AssignmentKind::Quiz),
            AssignmentKind::ESSAY => Ok(AssignmentKind::Essay),
            _ => Err(format!("Invalid assignment kind: {s}")),
        }
    }
}

// 题目类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "assignment.ts")]
pub enum QuestionType {
    SingleChoice,   // 单选
    MultipleChoice, // 多选
    TrueFalse,      // 判断
    ShortAnswer,    // 简答
    LongAnswer,     // 论述
}

impl QuestionType {
    pub const SINGLE_CHOICE: &'static str = "single_choice";
    pub const MULTIPLE_CHOICE: &'static str = "multiple_choice";
    pub const TRUE_FALSE: &'static str = "true_false";
    pub const SHORT_ANSWER: &'static str = "short_answer";
    pub const LONG_ANSWER: &'static str = "long_answer";

    /// 主观题：不自动评分，等待人工批改
    pub fn is_free_text(&self) -> bool {
        matches!(self, QuestionType::ShortAnswer | QuestionType::LongAnswer)
    }

    /// 恰好一个正确选项的题型
    pub fn is_single_answer(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::TrueFalse)
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的题目类型: '{s}'. 支持的类型: single_choice, multiple_choice, true_false, short_answer, long_answer"
            ))
        })
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuestionType::SingleChoice => QuestionType::SINGLE_CHOICE,
            QuestionType::MultipleChoice => QuestionType::MULTIPLE_CHOICE,
            QuestionType::TrueFalse => QuestionType::TRUE_FALSE,
            QuestionType::ShortAnswer => QuestionType::SHORT_ANSWER,
            QuestionType::LongAnswer => QuestionType::LONG_ANSWER,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            QuestionType::SINGLE_CHOICE => Ok(QuestionType::SingleChoice),
            QuestionType::MULTIPLE_CHOICE => Ok(QuestionType::MultipleChoice),
            QuestionType::TRUE_FALSE => Ok(QuestionType::TrueFalse),
            QuestionType::SHORT_ANSWER => Ok(QuestionType::ShortAnswer),
            QuestionType::LONG_ANSWER => Ok(QuestionType::LongAnswer),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

// 选项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
    pub sort_order: i32,
}

// 题目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Question {
    pub id: i64,
    pub assignment_id: i64,
    // 题干
    pub prompt: String,
    pub question_type: QuestionType,
    // 分值（正整数）
    pub points: i32,
    // 展示顺序
    pub sort_order: i32,
    pub explanation: Option<String>,
    // 选择题的选项（按 sort_order 排序）
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// 标记为正确的选项 ID 集合
    pub fn correct_option_ids(&self) -> BTreeSet<i64> {
        self.options
            .iter()
            .filter(|opt| opt.is_correct)
            .map(|opt| opt.id)
            .collect()
    }
}

// 作业（含题库）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "assignment.ts")]
pub struct Assignment {
    pub id: i64,
    // 所属课程 ID
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentKind,
    // 作业满分（提交时快照到提交记录）
    pub max_score: f64,
    // 及格线（百分比）
    pub passing_score: Option<f64>,
    // 最大尝试次数，None 表示不限
    pub max_attempts: Option<i32>,
    pub allow_late_submit: bool,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub auto_grade: bool,
    pub shuffle_questions: bool,
    pub show_correct_answers: bool,
    // 题库（按 sort_order 排序）
    pub questions: Vec<Question>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 所有题目分值之和
    pub fn max_possible_score(&self) -> i64 {
        self.questions.iter().map(|q| i64::from(q.points)).sum()
    }

    /// 给定时间是否已过截止时间
    pub fn is_past_due(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.due_date.is_some_and(|due| now > due)
    }
}
