use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rand::seq::SliceRandom;

use super::AssignmentService;
use crate::errors::{HWSystemError, Result};
use crate::grading::{GradingCapability, QuestionBank};
use crate::models::ApiResponse;
use crate::models::assignments::responses::AssignmentView;
use crate::models::users::entities::CallerIdentity;
use crate::services::error_response;
use crate::storage::Storage;

/// 任课教师与管理员看到参考答案；学生须在读且看不到答案
async fn build_view(
    storage: &dyn Storage,
    bank: &QuestionBank<'_>,
    caller: &CallerIdentity,
    assignment_id: i64,
) -> Result<AssignmentView> {
    let assignment = bank.load(assignment_id).await?;
    let course = storage
        .get_course_by_id(assignment.course_id)
        .await?
        .ok_or_else(|| {
            HWSystemError::database_operation(format!("课程 {} 不存在", assignment.course_id))
        })?;

    let reveal_answers = GradingCapability::new(caller).allows(&course);
    if !reveal_answers
        && !storage
            .is_actively_enrolled(assignment.course_id, caller.id)
            .await?
    {
        return Err(HWSystemError::not_enrolled("您未选修该课程"));
    }

    let mut view = AssignmentView::from_assignment(&assignment, reveal_answers);
    if assignment.shuffle_questions {
        view.questions.shuffle(&mut rand::rng());
    }
    Ok(view)
}

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    caller: CallerIdentity,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let bank = QuestionBank::new(storage.as_ref(), cache.as_deref());

    match build_view(storage.as_ref(), &bank, &caller, assignment_id).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
