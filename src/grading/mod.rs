//! 测评核心
//!
//! 题库 → 答题资格校验 → 评分引擎 → 提交生命周期 → 人工评分。
//! 只依赖 `Storage` trait，不关心 HTTP 层。

pub mod answer_sheet;
pub mod authoring;
pub mod bank;
pub mod engine;
pub mod lifecycle;
pub mod manual;
pub mod validator;

pub use answer_sheet::{AnswerSheet, AnswerValue};
pub use bank::QuestionBank;
pub use engine::{GradedAnswer, GradingOutcome, grade_answer_sheet, score_question};
pub use lifecycle::submit_test;
pub use manual::{GradingCapability, grade_submission};
pub use validator::validate_attempt;

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::models::assignments::entities::{Question, QuestionOption, QuestionType};

    pub(crate) fn choice_question(
        id: i64,
        question_type: QuestionType,
        points: i32,
        options: &[(i64, bool)],
    ) -> Question {
        Question {
            id,
            assignment_id: 1,
            prompt: format!("题目 {id}"),
            question_type,
            points,
            sort_order: id as i32,
            explanation: None,
            options: options
                .iter()
                .enumerate()
                .map(|(i, &(option_id, is_correct))| QuestionOption {
                    id: option_id,
                    question_id: id,
                    text: format!("选项 {option_id}"),
                    is_correct,
                    sort_order: i as i32,
                })
                .collect(),
        }
    }

    pub(crate) fn text_question(id: i64, question_type: QuestionType, points: i32) -> Question {
        choice_question(id, question_type, points, &[])
    }
}
