//! 作业与题库的创建校验

use tracing::info;

use crate::errors::{HWSystemError, Result};
use crate::grading::manual::GradingCapability;
use crate::models::assignments::entities::{Assignment, QuestionType};
use crate::models::assignments::requests::{CreateAssignmentRequest, CreateQuestionRequest};
use crate::models::users::entities::CallerIdentity;
use crate::storage::Storage;

/// 单题分值上限
pub const MAX_QUESTION_POINTS: i32 = 1000;

fn invalid_question(index: usize, msg: &str) -> HWSystemError {
    HWSystemError::invalid_question_bank(format!("第 {} 题: {msg}", index + 1))
}

fn validate_question(index: usize, q: &CreateQuestionRequest) -> Result<()> {
    if q.prompt.trim().is_empty() {
        return Err(invalid_question(index, "题干不能为空"));
    }
    if q.points <= 0 {
        return Err(invalid_question(index, "分值必须为正整数"));
    }
    if q.points > MAX_QUESTION_POINTS {
        return Err(invalid_question(
            index,
            &format!("分值不能超过 {MAX_QUESTION_POINTS}"),
        ));
    }

    let correct = q.options.iter().filter(|o| o.is_correct).count();
    match q.question_type {
        QuestionType::ShortAnswer | QuestionType::LongAnswer => {
            if !q.options.is_empty() {
                return Err(invalid_question(index, "主观题不能设置选项"));
            }
        }
        QuestionType::TrueFalse if q.options.len() != 2 => {
            return Err(invalid_question(index, "判断题必须恰有两个选项"));
        }
        QuestionType::SingleChoice | QuestionType::TrueFalse => {
            if q.options.is_empty() {
                return Err(invalid_question(index, "选择题至少需要一个选项"));
            }
            if correct != 1 {
                return Err(invalid_question(index, "必须恰有一个正确选项"));
            }
        }
        QuestionType::MultipleChoice => {
            if q.options.is_empty() {
                return Err(invalid_question(index, "选择题至少需要一个选项"));
            }
            if correct == 0 {
                return Err(invalid_question(index, "至少需要一个正确选项"));
            }
        }
    }

    if q.options.iter().any(|o| o.text.trim().is_empty()) {
        return Err(invalid_question(index, "选项内容不能为空"));
    }

    Ok(())
}

/// 校验创建作业请求
pub fn validate_create_request(req: &CreateAssignmentRequest) -> Result<()> {
    if req.title.trim().is_empty() {
        return Err(HWSystemError::validation("作业标题不能为空"));
    }
    if !req.max_score.is_finite() || req.max_score <= 0.0 {
        return Err(HWSystemError::validation("满分必须大于 0"));
    }
    if let Some(passing) = req.passing_score
        && !(passing.is_finite() && (0.0..=100.0).contains(&passing))
    {
        return Err(HWSystemError::validation("及格线必须在 0 到 100 之间"));
    }
    if let Some(limit) = req.max_attempts
        && limit < 1
    {
        return Err(HWSystemError::validation("最大尝试次数至少为 1"));
    }

    if req.kind.supports_structured_grading() && req.questions.is_empty() {
        return Err(HWSystemError::invalid_question_bank(format!(
            "{} 类型的作业至少需要一道题",
            req.kind
        )));
    }

    req.questions
        .iter()
        .enumerate()
        .try_for_each(|(index, q)| validate_question(index, q))?;

    // 题库总分须能以 i32 表示
    req.questions
        .iter()
        .try_fold(0i32, |total, q| total.checked_add(q.points))
        .map(|_| ())
        .ok_or_else(|| HWSystemError::invalid_question_bank("题库总分过大"))
}

/// 创建作业：课程存在 → 调用者为任课教师或管理员 → 请求合法
pub async fn create_assignment(
    storage: &dyn Storage,
    caller: &CallerIdentity,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    let course = storage
        .get_course_by_id(req.course_id)
        .await?
        .ok_or_else(|| HWSystemError::validation(format!("课程 {} 不存在", req.course_id)))?;

    GradingCapability::new(caller).ensure(&course)?;
    validate_create_request(&req)?;

    let assignment = storage.create_assignment(caller.id, req).await?;
    info!(
        "用户 {} 在课程 {} 创建作业 {}（{} 道题）",
        caller.id,
        course.id,
        assignment.id,
        assignment.questions.len()
    );

    Ok(assignment)
}
