//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub question_type: String,
    pub points: i32,
    pub sort_order: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub explanation: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(has_many = "super::question_options::Entity")]
    Options,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::question_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(
        self,
        options: Vec<crate::models::assignments::entities::QuestionOption>,
    ) -> crate::errors::Result<crate::models::assignments::entities::Question> {
        use crate::errors::HWSystemError;
        use crate::models::assignments::entities::Question;

        let question_type = self.question_type.parse().map_err(|e: String| {
            HWSystemError::database_operation(format!("题目 {} 数据损坏: {e}", self.id))
        })?;

        Ok(Question {
            id: self.id,
            assignment_id: self.assignment_id,
            prompt: self.prompt,
            question_type,
            points: self.points,
            sort_order: self.sort_order,
            explanation: self.explanation,
            options,
        })
    }
}
