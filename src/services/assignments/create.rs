use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::grading::{QuestionBank, authoring};
use crate::models::ApiResponse;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::users::entities::CallerIdentity;
use crate::services::error_response;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    caller: CallerIdentity,
    req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    match authoring::create_assignment(storage.as_ref(), &caller, req).await {
        Ok(assignment) => {
            QuestionBank::new(storage.as_ref(), cache.as_deref())
                .prime(&assignment)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "作业创建成功")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
