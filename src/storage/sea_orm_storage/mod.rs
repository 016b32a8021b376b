//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod submissions;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{HWSystemError, Result};
use crate::utils::retry::RetryPolicy;
use dashmap::DashMap;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 按 (user_id, assignment_id) 划分的提交锁表
pub(crate) type SubmitLockTable = DashMap<(i64, i64), Arc<tokio::sync::Mutex<()>>>;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    pub(crate) submit_locks: Arc<SubmitLockTable>,
    pub(crate) retry: RetryPolicy,
    pub(crate) max_submit_retries: u32,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| HWSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self::from_connection(db, config))
    }

    /// 基于已建立（且已迁移）的连接构建存储
    pub fn from_connection(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db,
            submit_locks: Arc::new(DashMap::new()),
            retry: RetryPolicy::from_config(&config.database),
            max_submit_retries: config.grading.max_submit_retries,
        }
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| HWSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| HWSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| HWSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(HWSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 取得（或创建）某用户某作业的提交锁
    fn submit_lock(&self, key: (i64, i64)) -> Arc<tokio::sync::Mutex<()>> {
        self.submit_locks.entry(key).or_default().clone()
    }

    /// 没有其他持有者时回收锁表项
    fn release_submit_lock(&self, key: (i64, i64)) {
        self.submit_locks
            .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 课程模块
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.retry
            .run("查询课程", || self.get_course_by_id_impl(course_id))
            .await
    }

    async fn is_actively_enrolled(&self, course_id: i64, user_id: i64) -> Result<bool> {
        self.retry
            .run("查询选课", || {
                self.is_actively_enrolled_impl(course_id, user_id)
            })
            .await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.retry
            .run("创建作业", || self.create_assignment_impl(created_by, &req))
            .await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.retry
            .run("查询作业", || self.get_assignment_by_id_impl(assignment_id))
            .await
    }

    // 提交模块
    async fn count_submissions(&self, assignment_id: i64, user_id: i64) -> Result<i64> {
        self.retry
            .run("统计提交", || {
                self.count_submissions_impl(assignment_id, user_id)
            })
            .await
    }

    async fn create_submission(
        &self,
        draft: NewSubmission,
        max_attempts: Option<i32>,
    ) -> Result<Submission> {
        let key = (draft.user_id, draft.assignment_id);
        let lock = self.submit_lock(key);
        let result = {
            let _guard = lock.lock().await;
            self.create_submission_impl(&draft, max_attempts).await
        };
        drop(lock);
        self.release_submit_lock(key);
        result
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.retry
            .run("查询提交", || self.get_submission_by_id_impl(submission_id))
            .await
    }

    async fn list_user_submissions(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Vec<Submission>> {
        self.retry
            .run("查询提交历史", || {
                self.list_user_submissions_impl(assignment_id, user_id)
            })
            .await
    }

    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<PaginatedResponse<SubmissionListItem>> {
        self.retry
            .run("查询提交列表", || {
                self.list_submissions_with_pagination_impl(&query)
            })
            .await
    }

    async fn apply_manual_grade(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
        graded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<Submission>> {
        self.retry
            .run("写入人工评分", || {
                self.apply_manual_grade_impl(
                    submission_id,
                    score,
                    feedback.clone(),
                    graded_by,
                    graded_at,
                )
            })
            .await
    }

    // 关闭连接池（克隆共享同一个池）
    async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| HWSystemError::database_connection(format!("关闭数据库连接失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("hwsystem.db").unwrap(),
            "sqlite://hwsystem.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://localhost/hw").unwrap(),
            "postgres://localhost/hw"
        );
        assert!(matches!(
            SeaOrmStorage::build_database_url("ftp://nope"),
            Err(HWSystemError::DatabaseConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_lock_entries_are_reclaimed() {
        let storage = test_support::memory_storage().await;
        let key = (1, 2);

        let lock = storage.submit_lock(key);
        assert_eq!(storage.submit_locks.len(), 1);

        // 仍被持有时不回收
        storage.release_submit_lock(key);
        assert_eq!(storage.submit_locks.len(), 1);

        drop(lock);
        storage.release_submit_lock(key);
        assert!(storage.submit_locks.is_empty());
    }
}
