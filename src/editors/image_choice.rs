//! 图片选择题编辑器

use super::{option_id, resize_options, CommonFields, QuestionEditor, MIN_OPTIONS};
use crate::error::AppResult;
use crate::models::{Envelope, ImageChoiceDetail, ImageOption, ImageRef, QuestionBody, QuestionKind};
use crate::services::local_images::{ImageFile, LocalImageStore};

#[derive(Debug, Clone, PartialEq)]
pub struct ImageChoiceEditor {
    common: CommonFields,
    images: Vec<ImageRef>,
    correct: Option<usize>,
    shuffle: bool,
}

impl ImageChoiceEditor {
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.correct
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.common.prompt = prompt.into();
    }

    pub fn set_option_count(&mut self, count: usize) {
        resize_options(&mut self.images, &mut self.correct, count);
    }

    /// 为选项选择图片文件，校验通过后使用本地预览引用
    pub fn set_image_file(
        &mut self,
        index: usize,
        store: &mut LocalImageStore,
        file: ImageFile,
    ) -> AppResult<()> {
        if index >= self.images.len() {
            return Ok(());
        }
        let local_ref = store.accept(file)?;
        self.images[index].url = local_ref;
        Ok(())
    }

    pub fn set_image_url(&mut self, index: usize, url: impl Into<String>) {
        if let Some(image) = self.images.get_mut(index) {
            image.url = url.into();
        }
    }

    pub fn set_alt(&mut self, index: usize, alt: impl Into<String>) {
        if let Some(image) = self.images.get_mut(index) {
            image.alt = alt.into();
        }
    }

    pub fn set_correct(&mut self, index: usize) {
        if index < self.images.len() {
            self.correct = Some(index);
        }
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }
}

impl QuestionEditor for ImageChoiceEditor {
    const KIND: QuestionKind = QuestionKind::ImageChoice;

    fn from_envelope(envelope: Option<&Envelope>) -> Self {
        if let Some(envelope) = envelope {
            if let QuestionBody::ImageChoice(detail) = &envelope.body {
                return Self {
                    common: CommonFields::from_envelope(envelope),
                    images: detail.options.iter().map(|o| o.image.clone()).collect(),
                    correct: detail.options.iter().position(|o| o.correct),
                    shuffle: detail.shuffle,
                };
            }
        }
        Self {
            common: CommonFields::default(),
            images: vec![ImageRef::default(); MIN_OPTIONS],
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
        QuestionBody::ImageChoice(ImageChoiceDetail {
            options: self
                .images
                .iter()
                .enumerate()
                .map(|(index, image)| ImageOption {
                    id: option_id(index),
                    image: image.clone(),
                    correct: self.correct == Some(index),
                })
                .collect(),
            shuffle: self.shuffle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::messages as msg;

    fn png(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_image_files_become_local_refs() {
        let mut store = LocalImageStore::new(1024);
        let mut editor = ImageChoiceEditor::from_envelope(None);
        editor.set_prompt("Con nào là con mèo?");
        assert_eq!(
            editor.status().first_error.as_deref(),
            Some(msg::option_missing_image("A").as_str())
        );

        editor.set_image_file(0, &mut store, png("cat.png")).unwrap();
        editor.set_image_file(1, &mut store, png("dog.png")).unwrap();
        editor.set_correct(0);

        assert!(editor.images().iter().all(|i| i.url.starts_with("blob:")));
        assert_eq!(store.len(), 2);
        assert!(editor.status().can_save);
    }

    #[test]
    fn test_rejected_file_leaves_option_untouched() {
        let mut store = LocalImageStore::new(2);
        let mut editor = ImageChoiceEditor::from_envelope(None);
        assert!(editor.set_image_file(0, &mut store, png("big.png")).is_err());
        assert!(editor.images()[0].url.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_hosted_url_and_alt_text() {
        let mut editor = ImageChoiceEditor::from_envelope(None);
        editor.set_prompt("Con nào là con mèo?");
        editor.set_image_url(0, "https://cdn.example.com/cat.png");
        editor.set_image_url(1, "https://cdn.example.com/dog.png");
        editor.set_alt(0, "mèo");
        editor.set_image_url(9, "https://cdn.example.com/none.png");
        editor.set_alt(9, "không có");
        editor.set_correct(0);

        assert_eq!(editor.images().len(), 2);
        assert_eq!(editor.images()[0].url, "https://cdn.example.com/cat.png");
        assert_eq!(editor.images()[0].alt, "mèo");
        assert!(editor.status().can_save);
    }

    #[test]
    fn test_removing_correct_option_clears_selection() {
        let mut editor = ImageChoiceEditor::from_envelope(None);
        editor.set_option_count(4);
        editor.set_correct(3);
        editor.set_option_count(3);
        assert_eq!(editor.correct_index(), None);
    }
}
