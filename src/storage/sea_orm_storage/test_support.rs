//! 测试辅助：内存 SQLite 存储与课程/选课种子数据

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sea_orm::{ActiveModelTrait, Set, SqlxSqliteConnector};

use super::SeaOrmStorage;
use crate::config::AppConfig;
use crate::entity::{courses, enrollments};
use crate::models::assignments::entities::{AssignmentKind, QuestionType};
use crate::models::assignments::requests::{
    CreateAssignmentRequest, CreateOptionRequest, CreateQuestionRequest,
};
use crate::models::courses::entities::EnrollmentStatus;

/// 单连接的内存数据库，已执行迁移
pub(crate) async fn memory_storage() -> SeaOrmStorage {
    let opt = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opt)
        .await
        .unwrap();
    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
    Migrator::up(&db, None).await.unwrap();

    let mut config = AppConfig::default();
    config.database.retry_backoff_ms = 1;
    SeaOrmStorage::from_connection(db, &config)
}

/// 文件数据库（WAL），同一路径可打开多个实例，各自拥有独立的提交锁表
pub(crate) async fn file_storage(path: &Path) -> SeaOrmStorage {
    let opt = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10))
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(opt)
        .await
        .unwrap();
    let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
    Migrator::up(&db, None).await.unwrap();

    let mut config = AppConfig::default();
    config.database.retry_backoff_ms = 1;
    config.grading.max_submit_retries = 32;
    SeaOrmStorage::from_connection(db, &config)
}

impl SeaOrmStorage {
    pub(crate) async fn seed_course(&self, teacher_id: i64) -> i64 {
        courses::ActiveModel {
            title: Set("线性代数".to_string()),
            teacher_id: Set(teacher_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
        .id
    }

    pub(crate) async fn seed_enrollment(
        &self,
        course_id: i64,
        user_id: i64,
        status: EnrollmentStatus,
    ) {
        enrollments::ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            status: Set(status.to_string()),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap();
    }
}

pub(crate) fn option(text: &str, is_correct: bool) -> CreateOptionRequest {
    CreateOptionRequest {
        text: text.to_string(),
        is_correct,
    }
}

pub(crate) fn question(
    question_type: QuestionType,
    points: i32,
    options: Vec<CreateOptionRequest>,
) -> CreateQuestionRequest {
    CreateQuestionRequest {
        prompt: format!("{question_type} 题"),
        question_type,
        points,
        explanation: Some("参见教材第三章".to_string()),
        options,
    }
}

pub(crate) fn single_choice(points: i32) -> CreateQuestionRequest {
    question(
        QuestionType::SingleChoice,
        points,
        vec![option("A", true), option("B", false), option("C", false)],
    )
}

pub(crate) fn long_answer(points: i32) -> CreateQuestionRequest {
    question(QuestionType::LongAnswer, points, vec![])
}

pub(crate) fn test_request(
    course_id: i64,
    questions: Vec<CreateQuestionRequest>,
) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        course_id,
        title: "第一单元测验".to_string(),
        description: None,
        kind: AssignmentKind::Test,
        max_score: 100.0,
        passing_score: Some(50.0),
        max_attempts: None,
        allow_late_submit: None,
        due_date: None,
        auto_grade: None,
        shuffle_questions: None,
        show_correct_answers: None,
        questions,
    }
}
