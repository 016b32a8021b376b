//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub kind: String,
    pub max_score: f64,
    pub passing_score: Option<f64>,
    pub max_attempts: Option<i32>,
    pub allow_late_submit: bool,
    pub due_date: Option<i64>,
    pub auto_grade: bool,
    pub shuffle_questions: bool,
    pub show_correct_answers: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型（需要已排序的题库）
impl Model {
    pub fn into_assignment(
        self,
        questions: Vec<crate::models::assignments::entities::Question>,
    ) -> crate::errors::Result<crate::models::assignments::entities::Assignment> {
        use crate::errors::HWSystemError;
        use crate::models::assignments::entities::Assignment;
        use chrono::{DateTime, Utc};

        let kind = self.kind.parse().map_err(|e: String| {
            HWSystemError::database_operation(format!("作业 {} 数据损坏: {e}", self.id))
        })?;

        Ok(Assignment {
            id: self.id,
            course_id: self.course_id,
            created_by: self.created_by,
            title: self.title,
            description: self.description,
            kind,
            max_score: self.max_score,
            passing_score: self.passing_score,
            max_attempts: self.max_attempts,
            allow_late_submit: self.allow_late_submit,
            due_date: self
                .due_date
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            auto_grade: self.auto_grade,
            shuffle_questions: self.shuffle_questions,
            show_correct_answers: self.show_correct_answers,
            questions,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
