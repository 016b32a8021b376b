pub mod assignments;
pub mod submissions;

pub use assignments::AssignmentService;
pub use submissions::SubmissionService;

use actix_web::{HttpResponse, http::StatusCode};
use tracing::{error, info};

use crate::errors::HWSystemError;
use crate::models::ApiResponse;

/// 业务错误对应的 HTTP 状态码
pub(crate) fn status_of(err: &HWSystemError) -> StatusCode {
    match err {
        HWSystemError::Validation(_)
        | HWSystemError::MissingAnswers(_)
        | HWSystemError::InvalidAssignmentKind(_)
        | HWSystemError::InvalidQuestionBank(_) => StatusCode::BAD_REQUEST,
        HWSystemError::Authentication(_) => StatusCode::UNAUTHORIZED,
        HWSystemError::NotAuthorized(_) | HWSystemError::NotEnrolled(_) => StatusCode::FORBIDDEN,
        HWSystemError::AssignmentNotFound(_) | HWSystemError::SubmissionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        HWSystemError::AttemptsExceeded(_) => StatusCode::CONFLICT,
        HWSystemError::DeadlinePassed(_) | HWSystemError::ScoreOutOfRange(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        HWSystemError::DatabaseConnection(_) | HWSystemError::CacheConnection(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        HWSystemError::CachePluginNotFound(_)
        | HWSystemError::DatabaseConfig(_)
        | HWSystemError::DatabaseOperation(_)
        | HWSystemError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 将业务错误转换为统一的 API 错误响应
pub(crate) fn error_response(err: &HWSystemError) -> HttpResponse {
    let status = status_of(err);
    if status.is_server_error() {
        error!("{} {}: {}", err.code(), err.error_type(), err.message());
    } else {
        info!("{} {}: {}", err.code(), err.error_type(), err.message());
    }
    HttpResponse::build(status).json(ApiResponse::from_error(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            status_of(&HWSystemError::missing_answers("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&HWSystemError::not_enrolled("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(&HWSystemError::attempts_exceeded_limit(3)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&HWSystemError::submission_not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(&HWSystemError::score_out_of_range_bound(10.0)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(&HWSystemError::database_connection("x")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(&HWSystemError::database_operation("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
