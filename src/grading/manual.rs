//! 人工评分
//!
//! 教师对提交给出最终分数。分数是覆盖而非累加，可对已评分的提交重新评分（以最后一次为准）。

use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::{HWSystemError, Result};
use crate::models::courses::entities::Course;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::CallerIdentity;
use crate::storage::Storage;

/// 「调用者能否批改某课程的提交」的唯一判定点
pub struct GradingCapability<'a> {
    caller: &'a CallerIdentity,
}

impl<'a> GradingCapability<'a> {
    pub fn new(caller: &'a CallerIdentity) -> Self {
        Self { caller }
    }

    /// 管理员，或课程的任课教师
    pub fn allows(&self, course: &Course) -> bool {
        self.caller.is_admin() || course.teacher_id == self.caller.id
    }

    pub fn ensure(&self, course: &Course) -> Result<()> {
        if self.allows(course) {
            Ok(())
        } else {
            Err(HWSystemError::not_authorized("只有任课教师或管理员可以批改该课程的提交"))
        }
    }
}

/// 校验人工评分的分数：有限值且位于 [0, max_score]
pub fn check_score(score: f64, max_score: f64) -> Result<()> {
    if score.is_finite() && (0.0..=max_score).contains(&score) {
        Ok(())
    } else {
        Err(HWSystemError::score_out_of_range_bound(max_score))
    }
}

/// 解析提交所属课程
pub async fn course_of_submission(
    storage: &dyn Storage,
    submission: &Submission,
) -> Result<Course> {
    let assignment = storage
        .get_assignment_by_id(submission.assignment_id)
        .await?
        .ok_or_else(|| {
            HWSystemError::assignment_not_found(format!(
                "作业 {} 不存在",
                submission.assignment_id
            ))
        })?;

    storage
        .get_course_by_id(assignment.course_id)
        .await?
        .ok_or_else(|| {
            HWSystemError::database_operation(format!("课程 {} 不存在", assignment.course_id))
        })
}

/// 人工评分：提交存在 → 有批改权限 → 分数合法 → 单条 UPDATE 写入
pub async fn grade_submission(
    storage: &dyn Storage,
    submission_id: i64,
    caller: &CallerIdentity,
    score: f64,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<Submission> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| HWSystemError::submission_not_found(format!("提交 {submission_id} 不存在")))?;

    let course = course_of_submission(storage, &submission).await?;
    GradingCapability::new(caller).ensure(&course)?;

    // max_score 为提交时的快照，不会再变
    check_score(score, submission.max_score)?;

    let graded = storage
        .apply_manual_grade(submission_id, score, feedback, caller.id, now)
        .await?
        .ok_or_else(|| HWSystemError::submission_not_found(format!("提交 {submission_id} 不存在")))?;

    info!(
        "用户 {} 批改提交 {}，分数 {}/{}",
        caller.id, submission_id, score, graded.max_score
    );

    Ok(graded)
}
