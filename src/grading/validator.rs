//! 答题资格校验（评分前的预检查，无副作用）

use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::Assignment;
use crate::storage::Storage;

/// 依次检查作业类型、选课状态与尝试次数，返回已有的提交次数
///
/// 尝试次数上限会在创建提交的事务内再次校验。
pub async fn validate_attempt(
    storage: &dyn Storage,
    assignment: &Assignment,
    user_id: i64,
) -> Result<i64> {
    if !assignment.kind.supports_structured_grading() {
        return Err(HWSystemError::invalid_assignment_kind(format!(
            "{} 类型的作业不支持在线答题",
            assignment.kind
        )));
    }

    if !storage
        .is_actively_enrolled(assignment.course_id, user_id)
        .await?
    {
        return Err(HWSystemError::not_enrolled("您未选修该课程"));
    }

    let prior = storage.count_submissions(assignment.id, user_id).await?;
    if let Some(limit) = assignment.max_attempts
        && prior >= i64::from(limit)
    {
        return Err(HWSystemError::attempts_exceeded_limit(limit));
    }

    Ok(prior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentKind;
    use crate::models::courses::entities::EnrollmentStatus;
    use crate::models::submissions::entities::{NewSubmission, SubmissionStatus};
    use crate::storage::sea_orm_storage::test_support::{memory_storage, single_choice, test_request};

    async fn setup(
        kind: AssignmentKind,
        max_attempts: Option<i32>,
    ) -> (crate::storage::sea_orm_storage::SeaOrmStorage, Assignment) {
        let storage = memory_storage().await;
        let course_id = storage.seed_course(7).await;
        storage
            .seed_enrollment(course_id, 1, EnrollmentStatus::Active)
            .await;
        storage
            .seed_enrollment(course_id, 2, EnrollmentStatus::Completed)
            .await;

        let mut req = test_request(course_id, vec![single_choice(5)]);
        req.kind = kind;
        req.max_attempts = max_attempts;
        let assignment = storage.create_assignment(7, req).await.unwrap();
        (storage, assignment)
    }

    fn empty_draft(assignment_id: i64, user_id: i64) -> NewSubmission {
        NewSubmission {
            assignment_id,
            user_id,
            status: SubmissionStatus::Graded,
            score: Some(0.0),
            max_score: 100.0,
            is_late: false,
            time_spent: None,
            submitted_at: chrono::Utc::now(),
            graded_at: Some(chrono::Utc::now()),
            answers: vec![],
        }
    }

    #[tokio::test]
    async fn test_non_test_kinds_are_rejected() {
        for kind in [
            AssignmentKind::Practical,
            AssignmentKind::Project,
            AssignmentKind::Essay,
        ] {
            let (storage, assignment) = setup(kind, None).await;
            let err = validate_attempt(&storage, &assignment, 1).await.unwrap_err();
            assert!(matches!(err, HWSystemError::InvalidAssignmentKind(_)));
        }
    }

    #[tokio::test]
    async fn test_enrollment_must_be_active() {
        let (storage, assignment) = setup(AssignmentKind::Quiz, None).await;

        assert_eq!(validate_attempt(&storage, &assignment, 1).await.unwrap(), 0);

        let err = validate_attempt(&storage, &assignment, 2).await.unwrap_err();
        assert!(matches!(err, HWSystemError::NotEnrolled(_)));

        let err = validate_attempt(&storage, &assignment, 3).await.unwrap_err();
        assert!(matches!(err, HWSystemError::NotEnrolled(_)));
    }

    #[tokio::test]
    async fn test_attempt_ceiling_carries_limit() {
        let (storage, assignment) = setup(AssignmentKind::Test, Some(2)).await;

        for _ in 0..2 {
            storage
                .create_submission(empty_draft(assignment.id, 1), assignment.max_attempts)
                .await
                .unwrap();
        }

        let err = validate_attempt(&storage, &assignment, 1).await.unwrap_err();
        assert!(matches!(err, HWSystemError::AttemptsExceeded(_)));
        assert!(err.message().contains('2'));
    }
}
