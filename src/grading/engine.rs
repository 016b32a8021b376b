//! 评分引擎
//!
//! 纯函数：(题目, 作答) → (是否正确, 得分)，再汇总为整份提交的分数。
//! 不访问存储，不做异步等待。

use std::collections::BTreeSet;

use crate::grading::answer_sheet::{AnswerSheet, AnswerValue};
use crate::models::assignments::entities::Question;
use crate::models::submissions::entities::NewSubmissionAnswer;

/// 单题评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub selected_options: Vec<i64>,
    pub text_answer: Option<String>,
    pub is_correct: bool,
    pub points: i32,
}

impl From<GradedAnswer> for NewSubmissionAnswer {
    fn from(answer: GradedAnswer) -> Self {
        Self {
            question_id: answer.question_id,
            selected_options: answer.selected_options,
            text_answer: answer.text_answer,
            is_correct: answer.is_correct,
            points: answer.points,
        }
    }
}

/// 整份答题卡的评分结果，每道题恰有一条作答（未作答的题记 0 分）
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    pub answers: Vec<GradedAnswer>,
    pub total_score: i64,
    pub max_possible_score: i64,
    // 题库中是否含主观题
    pub needs_manual_grading: bool,
}

impl GradingOutcome {
    /// 得分率（百分比，保留两位小数），满分为 0 时为 0
    pub fn percentage(&self) -> f64 {
        if self.max_possible_score <= 0 {
            return 0.0;
        }
        let raw = self.total_score as f64 / self.max_possible_score as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    }

    /// 未设置及格线时视为通过
    pub fn passed(&self, passing_score: Option<f64>) -> bool {
        passing_score.is_none_or(|p| self.percentage() >= p)
    }
}

/// 对单道题评分
///
/// - 单选、判断：提交集合恰为唯一正确选项时得满分
/// - 多选：提交集合与正确集合完全相等时得满分，子集、超集均为 0
/// - 简答、论述：不自动评分，记 0 分
///
/// 没有选项或没有正确选项的客观题永远判错。
pub fn score_question(question: &Question, answer: Option<&AnswerValue>) -> GradedAnswer {
    if question.question_type.is_free_text() {
        let text_answer = match answer {
            Some(AnswerValue::Text(text)) => Some(text.clone()),
            _ => None,
        };
        return GradedAnswer {
            question_id: question.id,
            selected_options: Vec::new(),
            text_answer,
            is_correct: false,
            points: 0,
        };
    }

    let selected: BTreeSet<i64> = match answer {
        Some(AnswerValue::Choice(ids)) => ids.clone(),
        _ => BTreeSet::new(),
    };
    let correct = question.correct_option_ids();

    let well_formed = if question.question_type.is_single_answer() {
        correct.len() == 1
    } else {
        !correct.is_empty()
    };
    let is_correct = well_formed && selected == correct;

    GradedAnswer {
        question_id: question.id,
        selected_options: selected.into_iter().collect(),
        text_answer: None,
        is_correct,
        points: if is_correct { question.points } else { 0 },
    }
}

/// 按题库顺序对整份答题卡评分
pub fn grade_answer_sheet(questions: &[Question], sheet: &AnswerSheet) -> GradingOutcome {
    let answers: Vec<GradedAnswer> = questions
        .iter()
        .map(|q| score_question(q, sheet.get(q.id)))
        .collect();

    GradingOutcome {
        total_score: answers.iter().map(|a| i64::from(a.points)).sum(),
        max_possible_score: questions.iter().map(|q| i64::from(q.points)).sum(),
        needs_manual_grading: questions.iter().any(|q| q.question_type.is_free_text()),
        answers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::test_fixtures::{choice_question, text_question};
    use crate::models::assignments::entities::QuestionType;
    use crate::models::submissions::requests::SubmittedAnswer;

    fn choice(ids: &[i64]) -> AnswerValue {
        AnswerValue::Choice(ids.iter().copied().collect())
    }

    #[test]
    fn test_single_choice_scoring() {
        let q = choice_question(1, QuestionType::SingleChoice, 5, &[(10, true), (11, false)]);

        let hit = score_question(&q, Some(&choice(&[10])));
        assert!(hit.is_correct);
        assert_eq!(hit.points, 5);

        let miss = score_question(&q, Some(&choice(&[11])));
        assert!(!miss.is_correct);
        assert_eq!(miss.points, 0);

        let none = score_question(&q, None);
        assert!(!none.is_correct);
        assert_eq!(none.points, 0);
        assert!(none.selected_options.is_empty());

        // 同时选中正确与错误选项
        let both = score_question(&q, Some(&choice(&[10, 11])));
        assert_eq!(both.points, 0);
    }

    #[test]
    fn test_true_false_scoring() {
        let q = choice_question(1, QuestionType::TrueFalse, 2, &[(20, false), (21, true)]);
        assert_eq!(score_question(&q, Some(&choice(&[21]))).points, 2);
        assert_eq!(score_question(&q, Some(&choice(&[20]))).points, 0);
    }

    #[test]
    fn test_multiple_choice_requires_exact_set() {
        let q = choice_question(
            1,
            QuestionType::MultipleChoice,
            10,
            &[(1, true), (2, true), (3, false)],
        );

        assert_eq!(score_question(&q, Some(&choice(&[2, 1]))).points, 10);
        // 子集
        assert_eq!(score_question(&q, Some(&choice(&[1]))).points, 0);
        // 超集
        assert_eq!(score_question(&q, Some(&choice(&[1, 2, 3]))).points, 0);
        // 不相交
        assert_eq!(score_question(&q, Some(&choice(&[3]))).points, 0);
        assert_eq!(score_question(&q, Some(&choice(&[]))).points, 0);
    }

    #[test]
    fn test_malformed_choice_questions_are_always_incorrect() {
        let no_options = choice_question(1, QuestionType::SingleChoice, 5, &[]);
        assert!(!score_question(&no_options, Some(&choice(&[]))).is_correct);

        let no_correct = choice_question(2, QuestionType::MultipleChoice, 5, &[(1, false)]);
        assert!(!score_question(&no_correct, Some(&choice(&[]))).is_correct);

        let two_correct = choice_question(3, QuestionType::SingleChoice, 5, &[(1, true), (2, true)]);
        assert!(!score_question(&two_correct, Some(&choice(&[1, 2]))).is_correct);
    }

    #[test]
    fn test_free_text_is_never_auto_scored() {
        let q = text_question(1, QuestionType::LongAnswer, 10);
        let graded = score_question(&q, Some(&AnswerValue::Text("详细论述".to_string())));

        assert!(!graded.is_correct);
        assert_eq!(graded.points, 0);
        assert_eq!(graded.text_answer.as_deref(), Some("详细论述"));
        assert!(graded.selected_options.is_empty());
    }

    #[test]
    fn test_one_hit_one_miss_is_fifty_percent() {
        let bank = vec![
            choice_question(1, QuestionType::SingleChoice, 5, &[(10, true), (11, false)]),
            choice_question(2, QuestionType::SingleChoice, 5, &[(20, true), (21, false)]),
        ];
        let sheet = AnswerSheet::parse(
            &bank,
            vec![
                SubmittedAnswer::Choice {
                    question_id: 1,
                    selected_options: vec![10],
                },
                SubmittedAnswer::Choice {
                    question_id: 2,
                    selected_options: vec![21],
                },
            ],
        )
        .unwrap();

        let outcome = grade_answer_sheet(&bank, &sheet);
        assert_eq!(outcome.total_score, 5);
        assert_eq!(outcome.max_possible_score, 10);
        assert_eq!(outcome.percentage(), 50.0);
        assert!(outcome.passed(Some(50.0)));
        assert!(!outcome.passed(Some(60.0)));
        assert!(outcome.passed(None));
        assert!(!outcome.needs_manual_grading);
    }

    #[test]
    fn test_omitted_questions_are_scored_zero() {
        let bank = vec![
            choice_question(1, QuestionType::SingleChoice, 5, &[(10, true)]),
            choice_question(2, QuestionType::SingleChoice, 5, &[(20, true)]),
            text_question(3, QuestionType::ShortAnswer, 5),
        ];
        let sheet = AnswerSheet::parse(
            &bank,
            vec![SubmittedAnswer::Choice {
                question_id: 1,
                selected_options: vec![10],
            }],
        )
        .unwrap();

        let outcome = grade_answer_sheet(&bank, &sheet);
        assert_eq!(outcome.answers.len(), 3);
        assert_eq!(
            outcome.answers.iter().map(|a| a.question_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(outcome.answers[1].points, 0);
        assert_eq!(outcome.answers[2].text_answer, None);
        assert_eq!(outcome.total_score, 5);
        assert!(outcome.needs_manual_grading);
    }

    #[test]
    fn test_large_point_values_do_not_overflow() {
        let bank = vec![
            choice_question(1, QuestionType::SingleChoice, i32::MAX, &[(10, true)]),
            choice_question(2, QuestionType::SingleChoice, i32::MAX, &[(20, true)]),
        ];
        let sheet = AnswerSheet::parse(
            &bank,
            vec![
                SubmittedAnswer::Choice {
                    question_id: 1,
                    selected_options: vec![10],
                },
                SubmittedAnswer::Choice {
                    question_id: 2,
                    selected_options: vec![20],
                },
            ],
        )
        .unwrap();

        let outcome = grade_answer_sheet(&bank, &sheet);
        assert_eq!(outcome.total_score, 2 * i64::from(i32::MAX));
        assert_eq!(outcome.max_possible_score, 2 * i64::from(i32::MAX));
        assert_eq!(outcome.percentage(), 100.0);
        assert!(outcome.passed(Some(100.0)));
    }

    #[test]
    fn test_zero_max_score_does_not_divide_by_zero() {
        let outcome = GradingOutcome {
            answers: vec![],
            total_score: 0,
            max_possible_score: 0,
            needs_manual_grading: false,
        };
        assert_eq!(outcome.percentage(), 0.0);
        assert!(!outcome.passed(Some(1.0)));
        assert!(outcome.passed(Some(0.0)));
    }

    #[test]
    fn test_percentage_is_rounded_to_two_decimals() {
        let outcome = GradingOutcome {
            answers: vec![],
            total_score: 1,
            max_possible_score: 3,
            needs_manual_grading: false,
        };
        assert_eq!(outcome.percentage(), 33.33);
    }
}
