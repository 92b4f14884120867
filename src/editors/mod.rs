//! 题型编辑器
//!
//! 每个编辑器持有自己的表单状态，任何字段变化后都可以通过 `status()`
//! 重新构建信封并校验，得到第一条错误以及是否允许保存。

pub mod expression;
pub mod fib_single;
pub mod image_choice;
pub mod matching_pairs;
pub mod mcq_single;
pub mod multiple_fill_in;
pub mod vertical_calculation;

use crate::error::AppResult;
use crate::factory::{make_envelope, EnvelopeExtras};
use crate::models::{Envelope, Media, Meta, QuestionBody, QuestionKind, Scoring};
use crate::services::local_images::{ImageFile, LocalImageStore};
use crate::validation::{validate, ValidationReport};

pub use expression::ExpressionEditor;
pub use fib_single::FibSingleEditor;
pub use image_choice::ImageChoiceEditor;
pub use matching_pairs::MatchingPairsEditor;
pub use mcq_single::McqSingleEditor;
pub use multiple_fill_in::MultipleFillInEditor;
pub use vertical_calculation::VerticalCalculationEditor;

/// 选项数量范围
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

/// 选项ID，按位置分配
pub fn option_id(index: usize) -> String {
    char::from(b'A' + (index % 26) as u8).to_string()
}

/// 编辑器状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorStatus {
    pub first_error: Option<String>,
    pub can_save: bool,
}

impl From<&ValidationReport> for EditorStatus {
    fn from(report: &ValidationReport) -> Self {
        Self {
            first_error: report.first_error().map(str::to_string),
            can_save: report.valid,
        }
    }
}

/// 所有题型共有的表单字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonFields {
    pub prompt: String,
    pub media: Vec<Media>,
    pub explanation: Option<String>,
    pub hints: Vec<String>,
    pub scoring: Scoring,
    pub meta: Meta,
}

impl CommonFields {
    pub fn from_envelope(envelope: &Envelope) -> Self {
        Self {
            prompt: envelope.prompt.clone(),
            media: envelope.media.clone(),
            explanation: envelope.explanation.clone(),
            hints: envelope.hints.clone(),
            scoring: envelope.scoring.clone(),
            meta: envelope.meta.clone(),
        }
    }

    pub fn extras(&self) -> EnvelopeExtras {
        EnvelopeExtras {
            version: None,
            media: Some(self.media.clone()),
            explanation: self
                .explanation
                .clone()
                .filter(|e| !e.trim().is_empty()),
            hints: Some(self.hints.clone()),
            scoring: Some(self.scoring.clone()),
            meta: Some(self.meta.clone()),
        }
    }

    /// 添加一张题干图片，返回本地预览引用
    pub fn attach_image(
        &mut self,
        store: &mut LocalImageStore,
        file: ImageFile,
        alt: impl Into<String>,
    ) -> AppResult<String> {
        let local_ref = store.accept(file)?;
        self.media.push(Media::image(local_ref.clone(), alt));
        Ok(local_ref)
    }

    pub fn remove_media(&mut self, index: usize) -> Option<Media> {
        (index < self.media.len()).then(|| self.media.remove(index))
    }
}

/// 编辑器公共接口
pub trait QuestionEditor: Sized {
    const KIND: QuestionKind;

    /// 新建（None）或从已有信封进入编辑模式
    fn from_envelope(envelope: Option<&Envelope>) -> Self;

    fn common(&self) -> &CommonFields;

    fn common_mut(&mut self) -> &mut CommonFields;

    /// 由当前表单状态得到题型数据
    fn body(&self) -> QuestionBody;

    fn envelope(&self) -> Envelope {
        let common = self.common();
        make_envelope(self.body(), common.prompt.clone(), common.extras())
    }

    fn validate(&self) -> ValidationReport {
        validate(&self.envelope())
    }

    fn status(&self) -> EditorStatus {
        EditorStatus::from(&self.validate())
    }
}

/// 调整选项数量
///
/// 保留原有选项；正确答案被删除时清空选择
pub(crate) fn resize_options<T: Default>(
    items: &mut Vec<T>,
    correct: &mut Option<usize>,
    count: usize,
) {
    let count = count.clamp(MIN_OPTIONS, MAX_OPTIONS);
    items.resize_with(count, T::default);
    if correct.is_some_and(|c| c >= count) {
        *correct = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_ids() {
        assert_eq!(option_id(0), "A");
        assert_eq!(option_id(5), "F");
    }

    #[test]
    fn test_resize_keeps_or_clears_correct() {
        let mut items = vec![1, 2, 3, 4];
        let mut correct = Some(1);
        resize_options(&mut items, &mut correct, 3);
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(correct, Some(1));

        let mut correct = Some(3);
        let mut items = vec![1, 2, 3, 4];
        resize_options(&mut items, &mut correct, 2);
        assert_eq!(correct, None);

        resize_options(&mut items, &mut correct, 10);
        assert_eq!(items.len(), MAX_OPTIONS);
        assert_eq!(&items[..3], &[1, 2, 0]);
    }

    #[test]
    fn test_attach_and_remove_media() {
        let mut store = LocalImageStore::new(1024);
        let mut common = CommonFields::default();
        let local_ref = common
            .attach_image(&mut store, ImageFile::new("map.png", "image/png", vec![1]), "bản đồ")
            .unwrap();
        assert_eq!(common.media.len(), 1);

        assert_eq!(common.remove_media(3), None);
        assert_eq!(common.media.len(), 1);

        let removed = common.remove_media(0).unwrap();
        assert_eq!(removed.url, local_ref);
        assert_eq!(removed.alt, "bản đồ");
        assert!(common.media.is_empty());
    }
}
