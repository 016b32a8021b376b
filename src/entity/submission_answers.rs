//! 作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submission_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    // JSON 数组形式存储的选项 ID
    #[sea_orm(column_type = "Text")]
    pub selected_options: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_answer: Option<String>,
    pub is_correct: bool,
    pub points: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(
        self,
    ) -> crate::errors::Result<crate::models::submissions::entities::SubmissionAnswer> {
        let selected_options: Vec<i64> = serde_json::from_str(&self.selected_options)?;

        Ok(crate::models::submissions::entities::SubmissionAnswer {
            id: self.id,
            submission_id: self.submission_id,
            question_id: self.question_id,
            selected_options,
            text_answer: self.text_answer,
            is_correct: self.is_correct,
            points: self.points,
        })
    }
}
