//! 作业与题库存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Entity as Assignments};
use crate::entity::question_options::{
    ActiveModel as OptionActiveModel, Column as OptionColumn, Entity as QuestionOptions,
};
use crate::entity::questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as Questions,
};
use crate::errors::Result;
use crate::models::assignments::{
    entities::{Assignment, Question, QuestionOption},
    requests::CreateAssignmentRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业及题库（单个事务）
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: &CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let assignment = ActiveModel {
            course_id: Set(req.course_id),
            created_by: Set(created_by),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description.clone()),
            kind: Set(req.kind.to_string()),
            max_score: Set(req.max_score),
            passing_score: Set(req.passing_score),
            max_attempts: Set(req.max_attempts),
            allow_late_submit: Set(req.allow_late_submit.unwrap_or(false)),
            due_date: Set(req.due_date.map(|dt| dt.timestamp())),
            auto_grade: Set(req.auto_grade.unwrap_or(true)),
            shuffle_questions: Set(req.shuffle_questions.unwrap_or(false)),
            show_correct_answers: Set(req.show_correct_answers.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut questions = Vec::with_capacity(req.questions.len());
        for (q_index, q) in req.questions.iter().enumerate() {
            let question = QuestionActiveModel {
                assignment_id: Set(assignment.id),
                prompt: Set(q.prompt.clone()),
                question_type: Set(q.question_type.to_string()),
                points: Set(q.points),
                sort_order: Set(q_index as i32),
                explanation: Set(q.explanation.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            let mut options = Vec::with_capacity(q.options.len());
            for (o_index, o) in q.options.iter().enumerate() {
                let option = OptionActiveModel {
                    question_id: Set(question.id),
                    text: Set(o.text.clone()),
                    is_correct: Set(o.is_correct),
                    sort_order: Set(o_index as i32),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                options.push(option.into_option());
            }

            questions.push(question.into_question(options)?);
        }

        txn.commit().await?;

        assignment.into_assignment(questions)
    }

    /// 通过 ID 获取作业（题目、选项均按 sort_order 排序）
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let Some(assignment) = Assignments::find_by_id(assignment_id).one(&self.db).await? else {
            return Ok(None);
        };

        let question_models = Questions::find()
            .filter(QuestionColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(QuestionColumn::SortOrder)
            .order_by_asc(QuestionColumn::Id)
            .all(&self.db)
            .await?;

        let question_ids: Vec<i64> = question_models.iter().map(|q| q.id).collect();

        // 批量查询选项，按题目分组
        let mut options_by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
        if !question_ids.is_empty() {
            let option_models = QuestionOptions::find()
                .filter(OptionColumn::QuestionId.is_in(question_ids))
                .order_by_asc(OptionColumn::SortOrder)
                .order_by_asc(OptionColumn::Id)
                .all(&self.db)
                .await?;

            for option in option_models {
                options_by_question
                    .entry(option.question_id)
                    .or_default()
                    .push(option.into_option());
            }
        }

        let questions = question_models
            .into_iter()
            .map(|q| {
                let options = options_by_question.remove(&q.id).unwrap_or_default();
                q.into_question(options)
            })
            .collect::<Result<Vec<Question>>>()?;

        assignment.into_assignment(questions).map(Some)
    }
}
