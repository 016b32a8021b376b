use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::grading::{QuestionBank, submit_test as grade_and_store};
use crate::models::ApiResponse;
use crate::models::submissions::requests::SubmitTestRequest;
use crate::models::users::entities::CallerIdentity;
use crate::services::error_response;

pub async fn submit_test(
    service: &SubmissionService,
    request: &HttpRequest,
    caller: CallerIdentity,
    assignment_id: i64,
    req: SubmitTestRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    let assignment = match QuestionBank::new(storage.as_ref(), cache.as_deref())
        .load(assignment_id)
        .await
    {
        Ok(assignment) => assignment,
        Err(e) => return Ok(error_response(&e)),
    };

    match grade_and_store(
        storage.as_ref(),
        &assignment,
        caller.id,
        req,
        chrono::Utc::now(),
    )
    .await
    {
        Ok(resp) => Ok(HttpResponse::Created().json(ApiResponse::success(resp, "提交成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
