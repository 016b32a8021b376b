use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::{HWSystemError, Result};
use crate::grading::{GradingCapability, QuestionBank};
use crate::models::ApiResponse;
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::responses::{AnswerKeyItem, SubmissionDetail};
use crate::models::users::entities::CallerIdentity;
use crate::services::error_response;
use crate::storage::Storage;

fn answer_key(assignment: &Assignment) -> Vec<AnswerKeyItem> {
    assignment
        .questions
        .iter()
        .map(|q| AnswerKeyItem {
            question_id: q.id,
            correct_options: q.correct_option_ids().into_iter().collect(),
            max_points: q.points,
            explanation: q.explanation.clone(),
        })
        .collect()
}

/// 提交者本人、任课教师、管理员可查看；参考答案对本人仅在作业允许时附带
async fn build_detail(
    storage: &dyn Storage,
    bank: &QuestionBank<'_>,
    caller: &CallerIdentity,
    submission_id: i64,
) -> Result<SubmissionDetail> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| HWSystemError::submission_not_found(format!("提交 {submission_id} 不存在")))?;

    let assignment = bank.load(submission.assignment_id).await?;
    let course = storage
        .get_course_by_id(assignment.course_id)
        .await?
        .ok_or_else(|| {
            HWSystemError::database_operation(format!("课程 {} 不存在", assignment.course_id))
        })?;

    let is_staff = GradingCapability::new(caller).allows(&course);
    let is_owner = submission.user_id == caller.id;
    if !is_staff && !is_owner {
        return Err(HWSystemError::not_authorized("没有查看该提交的权限"));
    }

    let reveal = is_staff || assignment.show_correct_answers;
    Ok(SubmissionDetail {
        submission,
        assignment_title: assignment.title.clone(),
        answer_key: reveal.then(|| answer_key(&assignment)),
    })
}

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    caller: CallerIdentity,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let bank = QuestionBank::new(storage.as_ref(), cache.as_deref());

    match build_detail(storage.as_ref(), &bank, &caller, submission_id).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
