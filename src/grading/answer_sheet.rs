//! 答题卡：在入口处对提交的作答做一次性结构校验

use std::collections::{BTreeSet, HashMap};

use crate::errors::{HWSystemError, Result};
use crate::models::assignments::entities::Question;
use crate::models::submissions::requests::SubmittedAnswer;

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    // 去重后的选项 ID
    Choice(BTreeSet<i64>),
    Text(String),
}

/// 已校验的答题卡，按题目 ID 索引
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    entries: HashMap<i64, AnswerValue>,
}

impl AnswerSheet {
    /// 校验规则：
    /// - 作答列表为空 → `MissingAnswers`
    /// - 题目不属于该作业、同一题重复作答、作答形式与题型不符 → `Validation`
    ///
    /// 选项 ID 不属于该题不在此拒绝，评分时按答错处理。
    pub fn parse(questions: &[Question], answers: Vec<SubmittedAnswer>) -> Result<Self> {
        if answers.is_empty() {
            return Err(HWSystemError::missing_answers("作答不能为空"));
        }

        let question_types: HashMap<i64, _> = questions
            .iter()
            .map(|q| (q.id, q.question_type))
            .collect();

        let mut entries = HashMap::with_capacity(answers.len());
        for answer in answers {
            let question_id = answer.question_id();
            let Some(question_type) = question_types.get(&question_id) else {
                return Err(HWSystemError::validation(format!(
                    "题目 {question_id} 不属于该作业"
                )));
            };

            let value = match answer {
                SubmittedAnswer::Choice {
                    selected_options, ..
                } if !question_type.is_free_text() => {
                    AnswerValue::Choice(selected_options.into_iter().collect())
                }
                SubmittedAnswer::Text { text, .. } if question_type.is_free_text() => {
                    AnswerValue::Text(text)
                }
                _ => {
                    return Err(HWSystemError::validation(format!(
                        "题目 {question_id} 的作答形式与题型 {question_type} 不匹配"
                    )));
                }
            };

            if entries.insert(question_id, value).is_some() {
                return Err(HWSystemError::validation(format!(
                    "题目 {question_id} 重复作答"
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, question_id: i64) -> Option<&AnswerValue> {
        self.entries.get(&question_id)
    }
}
