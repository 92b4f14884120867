//! 连线题编辑器

use super::{CommonFields, QuestionEditor};
use crate::error::AppResult;
use crate::models::{
    Envelope, ImageRef, MatchColumn, MatchItem, MatchPair, MatchingPairsDetail, QuestionBody,
    QuestionKind,
};
use crate::services::local_images::{ImageFile, LocalImageStore};

/// 左列 / 右列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    fn id_prefix(self) -> char {
        match self {
            Side::Left => 'l',
            Side::Right => 'r',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingPairsEditor {
    common: CommonFields,
    columns: [MatchColumn; 2],
    pairs: Vec<MatchPair>,
    allow_partial_credit: bool,
    next_item: [usize; 2],
}

impl MatchingPairsEditor {
    pub fn column(&self, side: Side) -> &MatchColumn {
        &self.columns[side.index()]
    }

    pub fn pairs(&self) -> &[MatchPair] {
        &self.pairs
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.common.prompt = prompt.into();
    }

    pub fn set_title(&mut self, side: Side, title: impl Into<String>) {
        self.columns[side.index()].title = title.into();
    }

    /// 添加项目，返回其ID
    pub fn add_item(&mut self, side: Side, text: impl Into<String>) -> String {
        let slot = side.index();
        self.next_item[slot] += 1;
        let id = format!("{}{}", side.id_prefix(), self.next_item[slot]);
        self.columns[slot].items.push(MatchItem {
            id: id.clone(),
            text: text.into(),
            image: None,
        });
        id
    }

    pub fn set_item_text(&mut self, side: Side, id: &str, text: impl Into<String>) {
        if let Some(item) = self.item_mut(side, id) {
            item.text = text.into();
        }
    }

    pub fn set_item_image(
        &mut self,
        side: Side,
        id: &str,
        store: &mut LocalImageStore,
        file: ImageFile,
    ) -> AppResult<()> {
        if self.item_mut(side, id).is_none() {
            return Ok(());
        }
        let alt = file.file_name.clone();
        let url = store.accept(file)?;
        if let Some(item) = self.item_mut(side, id) {
            item.image = Some(ImageRef { url, alt });
        }
        Ok(())
    }

    /// 删除项目以及引用它的配对
    pub fn remove_item(&mut self, side: Side, id: &str) {
        self.columns[side.index()].items.retain(|i| i.id != id);
        self.pairs.retain(|p| match side {
            Side::Left => p.left != id,
            Side::Right => p.right != id,
        });
    }

    /// 连接左右两项，左项原有的连线会被替换
    pub fn connect(&mut self, left: &str, right: &str) {
        self.pairs.retain(|p| p.left != left && p.right != right);
        self.pairs.push(MatchPair {
            left: left.to_string(),
            right: right.to_string(),
        });
    }

    pub fn disconnect(&mut self, left: &str) {
        self.pairs.retain(|p| p.left != left);
    }

    pub fn set_allow_partial_credit(&mut self, allow: bool) {
        self.allow_partial_credit = allow;
    }

    fn item_mut(&mut self, side: Side, id: &str) -> Option<&mut MatchItem> {
        self.columns[side.index()]
            .items
            .iter_mut()
            .find(|i| i.id == id)
    }

    fn blank() -> Self {
        let mut editor = Self {
            common: CommonFields::default(),
            columns: [
                MatchColumn { title: String::new(), items: Vec::new() },
                MatchColumn { title: String::new(), items: Vec::new() },
            ],
            pairs: Vec::new(),
            allow_partial_credit: true,
            next_item: [0, 0],
        };
        for side in [Side::Left, Side::Right] {
            editor.add_item(side, "");
            editor.add_item(side, "");
        }
        editor
    }
}

/// 已有ID中最大的序号
fn max_suffix(column: &MatchColumn, prefix: char) -> usize {
    column
        .items
        .iter()
        .filter_map(|i| i.id.strip_prefix(prefix)?.parse::<usize>().ok())
        .max()
        .unwrap_or(0)
}

impl QuestionEditor for MatchingPairsEditor {
    const KIND: QuestionKind = QuestionKind::MatchingPairs;

    fn from_envelope(envelope: Option<&Envelope>) -> Self {
        let Some(envelope) = envelope else {
            return Self::blank();
        };
        let QuestionBody::MatchingPairs(detail) = &envelope.body else {
            return Self::blank();
        };

        let mut columns = detail.columns.iter().cloned();
        let left = columns.next().unwrap_or(MatchColumn { title: String::new(), items: Vec::new() });
        let right = columns.next().unwrap_or(MatchColumn { title: String::new(), items: Vec::new() });
        let next_item = [max_suffix(&left, 'l'), max_suffix(&right, 'r')];

        Self {
            common: CommonFields::from_envelope(envelope),
            columns: [left, right],
            pairs: detail.pairs.clone(),
            allow_partial_credit: detail.allow_partial_credit,
            next_item,
        }
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn body(&self) -> QuestionBody {
        QuestionBody::MatchingPairs(MatchingPairsDetail {
            columns: self.columns.to_vec(),
            pairs: self.pairs.clone(),
            allow_partial_credit: self.allow_partial_credit,
        })
    }
}
