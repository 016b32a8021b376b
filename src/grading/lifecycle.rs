//! 提交生命周期
//!
//! 初始状态在创建时一次性决定：
//! - 题库含主观题 → PENDING（score、graded_at 为空）
//! - 否则 → GRADED（score 为客观题总分，graded_at 为提交时间）
//!
//! PENDING → GRADED 只能经由人工评分；GRADED 不会回到 PENDING，重新作答会产生新的尝试。

use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::{HWSystemError, Result};
use crate::grading::answer_sheet::AnswerSheet;
use crate::grading::engine::{GradingOutcome, grade_answer_sheet};
use crate::grading::validator::validate_attempt;
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::{NewSubmission, SubmissionStatus};
use crate::models::submissions::requests::SubmitTestRequest;
use crate::models::submissions::responses::SubmitTestResponse;
use crate::storage::Storage;

/// 由评分结果构造待写入的提交
pub fn build_submission(
    assignment: &Assignment,
    user_id: i64,
    outcome: &GradingOutcome,
    time_spent: Option<i32>,
    now: DateTime<Utc>,
) -> NewSubmission {
    let (status, score, graded_at) = if outcome.needs_manual_grading {
        (SubmissionStatus::Pending, None, None)
    } else {
        (
            SubmissionStatus::Graded,
            Some(outcome.total_score as f64),
            Some(now),
        )
    };

    NewSubmission {
        assignment_id: assignment.id,
        user_id,
        status,
        score,
        max_score: assignment.max_score,
        is_late: assignment.is_past_due(now),
        time_spent,
        submitted_at: now,
        graded_at,
        answers: outcome.answers.iter().cloned().map(Into::into).collect(),
    }
}

/// 提交测验：校验资格 → 校验答题卡 → 评分 → 原子写入
pub async fn submit_test(
    storage: &dyn Storage,
    assignment: &Assignment,
    user_id: i64,
    req: SubmitTestRequest,
    now: DateTime<Utc>,
) -> Result<SubmitTestResponse> {
    validate_attempt(storage, assignment, user_id).await?;

    if assignment.is_past_due(now) && !assignment.allow_late_submit {
        return Err(HWSystemError::deadline_passed("已超过截止时间，不允许迟交"));
    }

    if let Some(spent) = req.time_spent
        && spent < 0
    {
        return Err(HWSystemError::validation("作答用时不能为负数"));
    }

    let sheet = AnswerSheet::parse(&assignment.questions, req.answers)?;
    let outcome = grade_answer_sheet(&assignment.questions, &sheet);

    let draft = build_submission(assignment, user_id, &outcome, req.time_spent, now);
    let submission = storage
        .create_submission(draft, assignment.max_attempts)
        .await?;

    info!(
        "用户 {} 提交作业 {} 第 {} 次尝试，状态 {}，客观题得分 {}/{}",
        user_id,
        assignment.id,
        submission.attempt_number,
        submission.status,
        outcome.total_score,
        outcome.max_possible_score
    );

    Ok(SubmitTestResponse {
        score: submission.is_graded().then_some(outcome.total_score),
        max_score: outcome.max_possible_score,
        percentage: outcome.percentage(),
        passed: outcome.passed(assignment.passing_score),
        attempt_number: submission.attempt_number,
        submission,
    })
}
