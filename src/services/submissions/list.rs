use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::{HWSystemError, Result};
use crate::grading::{GradingCapability, QuestionBank};
use crate::models::submissions::requests::{SubmissionListParams, SubmissionListQuery};
use crate::models::submissions::responses::SubmissionListItem;
use crate::models::users::entities::CallerIdentity;
use crate::models::{ApiResponse, PaginatedResponse};
use crate::services::error_response;
use crate::storage::Storage;

async fn list_for_course_staff(
    storage: &dyn Storage,
    bank: &QuestionBank<'_>,
    caller: &CallerIdentity,
    assignment_id: i64,
    params: SubmissionListParams,
) -> Result<PaginatedResponse<SubmissionListItem>> {
    let assignment = bank.load(assignment_id).await?;
    let course = storage
        .get_course_by_id(assignment.course_id)
        .await?
        .ok_or_else(|| {
            HWSystemError::database_operation(format!("课程 {} 不存在", assignment.course_id))
        })?;
    GradingCapability::new(caller).ensure(&course)?;

    storage
        .list_submissions_with_pagination(SubmissionListQuery {
            assignment_id,
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            status: params.status,
            user_id: params.user_id,
        })
        .await
}

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    caller: CallerIdentity,
    assignment_id: i64,
    params: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let bank = QuestionBank::new(storage.as_ref(), cache.as_deref());

    match list_for_course_staff(storage.as_ref(), &bank, &caller, assignment_id, params).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
