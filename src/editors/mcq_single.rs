//! 单选题编辑器

use super::{option_id, resize_options, CommonFields, QuestionEditor, MIN_OPTIONS};
use crate::models::{ChoiceOption, Envelope, McqSingleDetail, QuestionBody, QuestionKind};

#[derive(Debug, Clone, PartialEq)]
pub struct McqSingleEditor {
    common: CommonFields,
    /// 选项文本，ID 按位置分配
    options: Vec<String>,
    correct: Option<usize>,
    shuffle: bool,
}

impl McqSingleEditor {
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.correct
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.common.prompt = prompt.into();
    }

    pub fn set_option_count(&mut self, count: usize) {
        resize_options(&mut self.options, &mut self.correct, count);
    }

    pub fn set_option_text(&mut self, index: usize, text: impl Into<String>) {
        if let Some(option) = self.options.get_mut(index) {
            *option = text.into();
        }
    }

    pub fn set_correct(&mut self, index: usize) {
        if index < self.options.len() {
            self.correct = Some(index);
        }
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }
}

impl QuestionEditor for McqSingleEditor {
    const KIND: QuestionKind = QuestionKind::McqSingle;

    fn from_envelope(envelope: Option<&Envelope>) -> Self {
        if let Some(envelope) = envelope {
            if let QuestionBody::McqSingle(detail) = &envelope.body {
                return Self {
                    common: CommonFields::from_envelope(envelope),
                    options: detail.options.iter().map(|o| o.text.clone()).collect(),
                    correct: detail.options.iter().position(|o| o.correct),
                    shuffle: detail.shuffle,
                };
            }
        }
        Self {
            common: CommonFields::default(),
            options: vec![String::new(); MIN_OPTIONS],
            correct: None,
            shuffle: true,
        }
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn body(&self) -> QuestionBody {
        QuestionBody::McqSingle(McqSingleDetail {
            options: self
                .options
                .iter()
                .enumerate()
                .map(|(index, text)| ChoiceOption {
                    id: option_id(index),
                    text: text.clone(),
                    correct: self.correct == Some(index),
                })
                .collect(),
            shuffle: self.shuffle,
        })
    }
}
