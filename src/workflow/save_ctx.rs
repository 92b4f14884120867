//! 保存上下文
//!
//! 封装"正在保存第几份草稿"这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct SaveCtx {
    /// 草稿序号（从1开始）
    pub draft_index: usize,
    /// 草稿名称，通常是文件名
    pub draft_name: String,
}

impl SaveCtx {
    pub fn new(draft_index: usize, draft_name: impl Into<String>) -> Self {
        Self {
            draft_index,
            draft_name: draft_name.into(),
        }
    }
}

impl Display for SaveCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[草稿 {} {}]", self.draft_index, self.draft_name)
    }
}
