//! 多空填空题编辑器
//!
//! 内容由文本、空格、图片块组成；答案列表按空格出现的顺序生成

use std::collections::HashMap;

use super::{CommonFields, QuestionEditor};
use crate::error::AppResult;
use crate::models::{
    BlankAnswer, Envelope, FillBlock, MultipleFillInDetail, QuestionBody, QuestionKind,
};
use crate::services::local_images::{ImageFile, LocalImageStore};

#[derive(Debug, Clone, PartialEq)]
pub struct MultipleFillInEditor {
    common: CommonFields,
    blocks: Vec<FillBlock>,
    answers: HashMap<String, String>,
    next_blank: usize,
}

impl MultipleFillInEditor {
    pub fn blocks(&self) -> &[FillBlock] {
        &self.blocks
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.common.prompt = prompt.into();
    }

    pub fn push_text(&mut self, value: impl Into<String>) {
        self.blocks.push(FillBlock::Text {
            value: value.into(),
        });
    }

    /// 添加一个空格，返回其ID
    pub fn push_blank(&mut self) -> String {
        self.next_blank += 1;
        let id = format!("b{}", self.next_blank);
        self.blocks.push(FillBlock::Blank { id: id.clone() });
        id
    }

    pub fn push_image(
        &mut self,
        store: &mut LocalImageStore,
        file: ImageFile,
        alt: impl Into<String>,
    ) -> AppResult<String> {
        let src = store.accept(file)?;
        self.blocks.push(FillBlock::Image {
            src: src.clone(),
            alt: alt.into(),
        });
        Ok(src)
    }

    pub fn set_answer(&mut self, blank_id: &str, expression: impl Into<String>) {
        self.answers.insert(blank_id.to_string(), expression.into());
    }

    /// 删除内容块，删除空格时一并删除其答案
    pub fn remove_block(&mut self, index: usize) -> Option<FillBlock> {
        if index >= self.blocks.len() {
            return None;
        }
        let block = self.blocks.remove(index);
        if let FillBlock::Blank { id } = &block {
            self.answers.remove(id);
        }
        Some(block)
    }
}

impl QuestionEditor for MultipleFillInEditor {
    const KIND: QuestionKind = QuestionKind::MultipleFillIn;

    fn from_envelope(envelope: Option<&Envelope>) -> Self {
        if let Some(envelope) = envelope {
            if let QuestionBody::MultipleFillIn(detail) = &envelope.body {
                let next_blank = detail
                    .blocks
                    .iter()
                    .filter_map(|b| match b {
                        FillBlock::Blank { id } => id.strip_prefix('b')?.parse::<usize>().ok(),
                        _ => None,
                    })
                    .max()
                    .unwrap_or(0);
                return Self {
                    common: CommonFields::from_envelope(envelope),
                    blocks: detail.blocks.clone(),
                    answers: detail
                        .answers
                        .iter()
                        .map(|a| (a.id.clone(), a.expression.clone()))
                        .collect(),
                    next_blank,
                };
            }
        }
        Self {
            common: CommonFields::default(),
            blocks: Vec::new(),
            answers: HashMap::new(),
            next_blank: 0,
        }
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn body(&self) -> QuestionBody {
        let answers = self
            .blocks
            .iter()
            .filter_map(|b| match b {
                FillBlock::Blank { id } => Some(BlankAnswer {
                    id: id.clone(),
                    expression: self.answers.get(id).cloned().unwrap_or_default(),
                }),
                _ => None,
            })
            .collect();
        QuestionBody::MultipleFillIn(MultipleFillInDetail {
            blocks: self.blocks.clone(),
            answers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;
    use crate::test_support::envelope;
    use crate::validation::messages as msg;

    #[test]
    fn test_answers_follow_blanks() {
        let mut editor = MultipleFillInEditor::from_envelope(None);
        editor.set_prompt("Điền số thích hợp");
        editor.push_text("3 + ");
        let b1 = editor.push_blank();
        editor.push_text(" = 5");
        assert_eq!(
            editor.status().first_error.as_deref(),
            Some(msg::MIN_TWO_ANSWERS)
        );

        let b2 = editor.push_blank();
        editor.set_answer(&b1, "2");
        assert_eq!(
            editor.status().first_error.as_deref(),
            Some(msg::blank_answer_empty(&b2).as_str())
        );

        editor.set_answer(&b2, "7");
        assert!(editor.status().can_save);

        editor.remove_block(3);
        assert!(!editor.status().can_save);
    }

    #[test]
    fn test_edit_mode_continues_blank_numbering() {
        let original = envelope(QuestionKind::MultipleFillIn);
        let mut editor = MultipleFillInEditor::from_envelope(Some(&original));
        assert_eq!(editor.envelope(), original);
        assert_eq!(editor.push_blank(), "b3");
    }
}
