//! 课程与选课查询

use super::SeaOrmStorage;
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::errors::Result;
use crate::models::courses::entities::{Course, EnrollmentStatus};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

impl SeaOrmStorage {
    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id).one(&self.db).await?;
        Ok(result.map(|m| m.into_course()))
    }

    /// 是否存在在读状态的选课记录
    pub async fn is_actively_enrolled_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::UserId.eq(user_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::ACTIVE))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_storage;
    use crate::models::courses::entities::EnrollmentStatus;

    #[tokio::test]
    async fn test_only_active_enrollment_counts() {
        let storage = memory_storage().await;
        let course_id = storage.seed_course(7).await;
        storage
            .seed_enrollment(course_id, 1, EnrollmentStatus::Active)
            .await;
        storage
            .seed_enrollment(course_id, 2, EnrollmentStatus::Dropped)
            .await;

        assert!(storage.is_actively_enrolled_impl(course_id, 1).await.unwrap());
        assert!(!storage.is_actively_enrolled_impl(course_id, 2).await.unwrap());
        assert!(!storage.is_actively_enrolled_impl(course_id, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_course_resolves_teacher() {
        let storage = memory_storage().await;
        let course_id = storage.seed_course(7).await;

        let course = storage.get_course_by_id_impl(course_id).await.unwrap().unwrap();
        assert_eq!(course.teacher_id, 7);
        assert!(storage.get_course_by_id_impl(999).await.unwrap().is_none());
    }
}
