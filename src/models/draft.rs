//! 草稿文件（批量提交的输入）

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::envelope::{Media, Meta, Scoring};
use super::kind::QuestionKind;

/// 一个 TOML 草稿文件描述一道题
#[derive(Debug, Clone, Deserialize)]
pub struct DraftFile {
    pub kind: QuestionKind,
    #[serde(default)]
    pub prompt: String,
    pub detail: Value,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub scoring: Option<Scoring>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub media: Vec<Media>,
    /// 归属的子主题
    pub subtopic_id: i64,
    /// 已存在的题目ID，存在时执行更新
    #[serde(default)]
    pub question_id: Option<i64>,
    /// `blob:` 引用 → 相对于草稿文件的图片路径
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    #[serde(skip)]
    pub file_path: Option<String>,
}

impl DraftFile {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
