use std::sync::Arc;

use crate::models::{
    PaginatedResponse,
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    courses::entities::Course,
    submissions::{
        entities::{NewSubmission, Submission},
        requests::SubmissionListQuery,
        responses::SubmissionListItem,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 课程与选课（外部协作方的数据，只读）
    // 通过ID获取课程信息
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 用户是否在该课程中处于在读状态
    async fn is_actively_enrolled(&self, course_id: i64, user_id: i64) -> Result<bool>;

    /// 作业管理方法
    // 创建作业及其题库（题目、选项顺序即请求中的顺序）
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业（含排好序的题目和选项）
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;

    /// 提交管理方法
    // 统计用户在某作业下的提交次数
    async fn count_submissions(&self, assignment_id: i64, user_id: i64) -> Result<i64>;
    // 原子地创建提交及作答：事务内重新统计次数、校验上限并分配尝试序号
    async fn create_submission(
        &self,
        draft: NewSubmission,
        max_attempts: Option<i32>,
    ) -> Result<Submission>;
    // 通过ID获取提交（含作答）
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取用户某作业的全部提交，按尝试序号升序（不含作答）
    async fn list_user_submissions(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Vec<Submission>>;
    // 列出某作业的提交（分页）
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<SubmissionListItem>>;
    // 写入人工评分（单条 UPDATE），提交不存在时返回 None
    async fn apply_manual_grade(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
        graded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Submission>>;

    /// 生命周期
    // 关闭底层连接（停机时调用）
    async fn close(&self) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
