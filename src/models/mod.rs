//! 数据模型定义
//!
//! 业务实体、请求与响应结构，与 `entity` 模块中的数据库实体分离。

pub mod assignments;
pub mod common;
pub mod courses;
pub mod submissions;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

use crate::errors::HWSystemError;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    ValidationFailed = 1005,

    // 测评相关 4xxx
    AssignmentNotFound = 4001,
    SubmissionNotFound = 4002,
    InvalidAssignmentKind = 4003,
    NotEnrolled = 4004,
    AttemptsExceeded = 4005,
    MissingAnswers = 4006,
    GradingPermissionDenied = 4007,
    ScoreOutOfRange = 4008,
    DeadlinePassed = 4009,
    InvalidQuestionBank = 4010,

    // 服务端错误 5xxx
    InternalServerError = 5000,
    ServiceUnavailable = 5003,
}

impl From<&HWSystemError> for ErrorCode {
    fn from(err: &HWSystemError) -> Self {
        match err {
            HWSystemError::Validation(_) => ErrorCode::ValidationFailed,
            HWSystemError::Authentication(_) => ErrorCode::Unauthorized,
            HWSystemError::AssignmentNotFound(_) => ErrorCode::AssignmentNotFound,
            HWSystemError::SubmissionNotFound(_) => ErrorCode::SubmissionNotFound,
            HWSystemError::InvalidAssignmentKind(_) => ErrorCode::InvalidAssignmentKind,
            HWSystemError::NotEnrolled(_) => ErrorCode::NotEnrolled,
            HWSystemError::AttemptsExceeded(_) => ErrorCode::AttemptsExceeded,
            HWSystemError::MissingAnswers(_) => ErrorCode::MissingAnswers,
            HWSystemError::NotAuthorized(_) => ErrorCode::GradingPermissionDenied,
            HWSystemError::ScoreOutOfRange(_) => ErrorCode::ScoreOutOfRange,
            HWSystemError::DeadlinePassed(_) => ErrorCode::DeadlinePassed,
            HWSystemError::InvalidQuestionBank(_) => ErrorCode::InvalidQuestionBank,
            HWSystemError::DatabaseConnection(_) | HWSystemError::CacheConnection(_) => {
                ErrorCode::ServiceUnavailable
            }
            HWSystemError::CachePluginNotFound(_)
            | HWSystemError::DatabaseConfig(_)
            | HWSystemError::DatabaseOperation(_)
            | HWSystemError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&HWSystemError::attempts_exceeded_limit(2)),
            ErrorCode::AttemptsExceeded
        );
        assert_eq!(
            ErrorCode::from(&HWSystemError::not_authorized("x")),
            ErrorCode::GradingPermissionDenied
        );
        assert_eq!(
            ErrorCode::from(&HWSystemError::database_connection("x")),
            ErrorCode::ServiceUnavailable
        );
        assert_eq!(ErrorCode::Success as i32, 0);
    }
}
