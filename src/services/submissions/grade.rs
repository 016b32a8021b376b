use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::grading::grade_submission as apply_grade;
use crate::models::ApiResponse;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::users::entities::CallerIdentity;
use crate::services::error_response;

/// PUT /submissions/{id}/grade
pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    caller: CallerIdentity,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match apply_grade(
        storage.as_ref(),
        submission_id,
        &caller,
        req.score,
        req.feedback,
        chrono::Utc::now(),
    )
    .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "评分成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
