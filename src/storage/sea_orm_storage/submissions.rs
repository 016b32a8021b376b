//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submission_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as SubmissionAnswers,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{HWSystemError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo, PaginationQuery,
    submissions::{
        entities::{NewSubmission, Submission, SubmissionAnswer, SubmissionStatus},
        requests::SubmissionListQuery,
        responses::SubmissionListItem,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, RuntimeErr, Set, SqlErr, TransactionTrait,
};
use tracing::warn;

/// 单次事务的写入结果
enum InsertOutcome {
    Created(Submission),
    // 其他进程并发写入了同一用户同一作业的提交，需要重新统计
    Conflict,
}

/// 写入是否因并发事务而失败：唯一索引冲突，或数据库拒绝了过期快照上的写入
fn is_write_conflict(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }

    let (DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e))) = err
    else {
        return false;
    };
    let Some(db_err) = e.as_database_error() else {
        return false;
    };
    let Some(code) = db_err.code() else {
        return false;
    };

    if db_err
        .try_downcast_ref::<sea_orm::sqlx::sqlite::SqliteError>()
        .is_some()
    {
        // SQLITE_BUSY / SQLITE_LOCKED 及其扩展码（如 BUSY_SNAPSHOT）
        return code
            .parse::<i32>()
            .is_ok_and(|code| matches!(code & 0xff, 5 | 6));
    }

    // PostgreSQL / MySQL 的序列化失败与死锁
    matches!(&*code, "40001" | "40P01")
}

/// 提交事务失败时写入可能已经生效，不能作为瞬时错误重放
fn commit_failure(err: DbErr) -> HWSystemError {
    HWSystemError::database_operation(format!("提交事务失败，写入结果未知: {err}"))
}

impl SeaOrmStorage {
    /// 创建提交（调用方需持有该用户该作业的提交锁）
    ///
    /// 并发写入冲突时重新统计次数后重试，次数由 `grading.max_submit_retries` 限定。
    /// 瞬时错误只在事务提交前重试。
    pub async fn create_submission_impl(
        &self,
        draft: &NewSubmission,
        max_attempts: Option<i32>,
    ) -> Result<Submission> {
        let mut conflicts = 0;
        loop {
            let outcome = self
                .retry
                .run("创建提交", || self.insert_submission_tx(draft, max_attempts))
                .await?;

            match outcome {
                InsertOutcome::Created(submission) => return Ok(submission),
                InsertOutcome::Conflict if conflicts < self.max_submit_retries => {
                    conflicts += 1;
                    warn!(
                        "用户 {} 作业 {} 尝试序号冲突，第 {} 次重算",
                        draft.user_id, draft.assignment_id, conflicts
                    );
                }
                InsertOutcome::Conflict => {
                    return Err(HWSystemError::database_operation(
                        "尝试序号持续冲突，请稍后重试",
                    ));
                }
            }
        }
    }

    /// 统计 + 校验上限 + 写入提交与作答，全部在同一事务内完成
    async fn insert_submission_tx(
        &self,
        draft: &NewSubmission,
        max_attempts: Option<i32>,
    ) -> Result<InsertOutcome> {
        // 事务内只使用 txn，避免在单连接池上自锁
        let txn = self.db.begin().await?;

        let prior = Self::count_submissions_on(&txn, draft.assignment_id, draft.user_id).await?;
        if let Some(limit) = max_attempts.filter(|&limit| prior >= i64::from(limit)) {
            return Err(HWSystemError::attempts_exceeded_limit(limit));
        }
        let attempt_number = i32::try_from(prior + 1)
            .map_err(|_| HWSystemError::database_operation("尝试序号溢出"))?;

        let inserted = ActiveModel {
            assignment_id: Set(draft.assignment_id),
            user_id: Set(draft.user_id),
            attempt_number: Set(attempt_number),
            status: Set(draft.status.to_string()),
            score: Set(draft.score),
            max_score: Set(draft.max_score),
            feedback: Set(None),
            is_late: Set(draft.is_late),
            time_spent: Set(draft.time_spent),
            submitted_at: Set(draft.submitted_at.timestamp()),
            graded_at: Set(draft.graded_at.map(|dt| dt.timestamp())),
            graded_by: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        let submission = match inserted {
            Ok(model) => model,
            Err(e) if is_write_conflict(&e) => return Ok(InsertOutcome::Conflict),
            Err(e) => return Err(e.into()),
        };

        let mut answers = Vec::with_capacity(draft.answers.len());
        for answer in &draft.answers {
            let model = AnswerActiveModel {
                submission_id: Set(submission.id),
                question_id: Set(answer.question_id),
                selected_options: Set(serde_json::to_string(&answer.selected_options)?),
                text_answer: Set(answer.text_answer.clone()),
                is_correct: Set(answer.is_correct),
                points: Set(answer.points),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            answers.push(model.into_answer()?);
        }

        txn.commit().await.map_err(commit_failure)?;

        submission.into_submission(answers).map(InsertOutcome::Created)
    }

    async fn count_submissions_on<C: ConnectionTrait>(
        conn: &C,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<i64> {
        let count = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::UserId.eq(user_id))
            .count(conn)
            .await?;

        Ok(count as i64)
    }

    /// 统计用户在某作业下的提交次数
    pub async fn count_submissions_impl(&self, assignment_id: i64, user_id: i64) -> Result<i64> {
        Self::count_submissions_on(&self.db, assignment_id, user_id).await
    }

    /// 通过 ID 获取提交（含作答，按题目顺序写入的顺序返回）
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let Some(model) = Submissions::find_by_id(submission_id).one(&self.db).await? else {
            return Ok(None);
        };

        let answers = self.load_answers(submission_id).await?;
        model.into_submission(answers).map(Some)
    }

    async fn load_answers(&self, submission_id: i64) -> Result<Vec<SubmissionAnswer>> {
        SubmissionAnswers::find()
            .filter(AnswerColumn::SubmissionId.eq(submission_id))
            .order_by_asc(AnswerColumn::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| m.into_answer())
            .collect()
    }

    /// 获取学生某作业的提交历史（按尝试序号升序，不含作答）
    pub async fn list_user_submissions_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Vec<Submission>> {
        Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::AttemptNumber)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| m.into_submission(Vec::new()))
            .collect()
    }

    /// 列出某作业的提交（分页）
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: &SubmissionListQuery,
    ) -> Result<PaginatedResponse<SubmissionListItem>> {
        let (page, size) = PaginationQuery::clamped(query.page, query.size);

        let mut select = Submissions::find().filter(Column::AssignmentId.eq(query.assignment_id));

        // 提交者筛选
        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 排序
        select = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size as u64);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page((page - 1) as u64).await?;

        let items = models
            .into_iter()
            .map(|m| {
                m.into_submission(Vec::new())
                    .map(|s| SubmissionListItem::from(&s))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }

    /// 写入人工评分：分数、评语、状态、评分时间与评分人在同一条 UPDATE 中写入
    pub async fn apply_manual_grade_impl(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
        graded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Submission>> {
        let result = Submissions::update_many()
            .set(ActiveModel {
                status: Set(SubmissionStatus::Graded.to_string()),
                score: Set(Some(score)),
                feedback: Set(feedback),
                graded_at: Set(Some(graded_at.timestamp())),
                graded_by: Set(Some(graded_by)),
                ..Default::default()
            })
            .filter(Column::Id.eq(submission_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(submission_id).await
    }
}
