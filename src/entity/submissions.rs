//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub attempt_number: i32,
    pub status: String,
    pub score: Option<f64>,
    pub max_score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub is_late: bool,
    pub time_spent: Option<i32>,
    pub submitted_at: i64,
    pub graded_at: Option<i64>,
    pub graded_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(has_many = "super::submission_answers::Entity")]
    Answers,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::submission_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(
        self,
        answers: Vec<crate::models::submissions::entities::SubmissionAnswer>,
    ) -> crate::errors::Result<crate::models::submissions::entities::Submission> {
        use crate::errors::HWSystemError;
        use crate::models::submissions::entities::Submission;
        use chrono::{DateTime, Utc};

        let status = self.status.parse().map_err(|e: String| {
            HWSystemError::database_operation(format!("提交 {} 数据损坏: {e}", self.id))
        })?;

        Ok(Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            user_id: self.user_id,
            attempt_number: self.attempt_number,
            status,
            score: self.score,
            max_score: self.max_score,
            feedback: self.feedback,
            is_late: self.is_late,
            time_spent: self.time_spent,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
            graded_at: self
                .graded_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            graded_by: self.graded_by,
            answers,
        })
    }
}
