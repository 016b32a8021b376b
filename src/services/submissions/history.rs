use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::grading::QuestionBank;
use crate::models::ApiResponse;
use crate::models::submissions::responses::{SubmissionListItem, UserSubmissionHistoryResponse};
use crate::models::users::entities::CallerIdentity;
use crate::services::error_response;

pub async fn list_my_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    caller: CallerIdentity,
    assignment_id: i64,
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

    match storage.list_user_submissions(assignment_id, caller.id).await {
        Ok(submissions) => {
            let items: Vec<SubmissionListItem> =
                submissions.iter().map(SubmissionListItem::from).collect();
            let response = UserSubmissionHistoryResponse {
                attempts_used: items.len() as i64,
                max_attempts: assignment.max_attempts,
                items,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
