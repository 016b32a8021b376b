use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 课程（由外部课程服务维护，这里只关心任课教师）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    pub id: i64,
    pub title: String,
    // 任课教师 ID
    pub teacher_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 选课状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "course.ts")]
pub enum EnrollmentStatus {
    Active,    // 在读
    Completed, // 已结课
    Dropped,   // 已退课
}

impl EnrollmentStatus {
    pub const ACTIVE: &'static str = "active";
    pub const COMPLETED: &'static str = "completed";
    pub const DROPPED: &'static str = "dropped";
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "{}", EnrollmentStatus::ACTIVE),
            EnrollmentStatus::Completed => write!(f, "{}", EnrollmentStatus::COMPLETED),
            EnrollmentStatus::Dropped => write!(f, "{}", EnrollmentStatus::DROPPED),
        }
    }
}
