use super::{CommonFields, QuestionEditor};
use crate::models::{Envelope, FibSingleDetail, QuestionBody, QuestionKind};

/// 单空填空题编辑器
#[derive(Debug, Clone, PartialEq)]
pub struct FibSingleEditor {
    common: CommonFields,
    pub answer: String,
    pub case_sensitive: bool,
    pub normalize_space: bool,
}

impl FibSingleEditor {
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.common.prompt = prompt.into();
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = answer.into();
    }
}

impl QuestionEditor for FibSingleEditor {
    const KIND: QuestionKind = QuestionKind::FibSingle;

    fn from_envelope(envelope: Option<&Envelope>) -> Self {
        if let Some(envelope) = envelope {
            if let QuestionBody::FibSingle(detail) = &envelope.body {
                return Self {
                    common: CommonFields::from_envelope(envelope),
                    answer: detail.answer.clone(),
                    case_sensitive: detail.case_sensitive,
                    normalize_space: detail.normalize_space,
                };
            }
        }
        Self {
            common: CommonFields::default(),
            answer: String::new(),
            case_sensitive: false,
            normalize_space: true,
        }
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn body(&self) -> QuestionBody {
        QuestionBody::FibSingle(FibSingleDetail {
            answer: self.answer.clone(),
            case_sensitive: self.case_sensitive,
            normalize_space: self.normalize_space,
        })
    }
}
