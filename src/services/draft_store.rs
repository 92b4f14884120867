//! 本次会话中尚未归类的草稿
//!
//! 草稿只存在于内存中，退出登录时调用 [`DraftStore::clear`]。

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::{Envelope, HierarchySnapshot};

/// 一份草稿
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: String,
    pub envelope: Envelope,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 会话级草稿存储，按加入顺序保存
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: Vec<Draft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入草稿，返回草稿 id
    pub fn add(&mut self, envelope: Envelope) -> String {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        debug!("新增草稿 {} ({})", id, envelope.kind());
        self.drafts.push(Draft {
            id: id.clone(),
            envelope,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn list(&self) -> &[Draft] {
        &self.drafts
    }

    pub fn get(&self, id: &str) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.id == id)
    }

    /// 替换草稿内容，草稿不存在时返回 false
    pub fn update(&mut self, id: &str, envelope: Envelope) -> bool {
        match self.drafts.iter_mut().find(|d| d.id == id) {
            Some(draft) => {
                draft.envelope = envelope;
                draft.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Draft> {
        let index = self.drafts.iter().position(|d| d.id == id)?;
        Some(self.drafts.remove(index))
    }

    /// 归类草稿：移出存储并写入层级快照
    pub fn classify(&mut self, id: &str, snapshot: HierarchySnapshot) -> Option<Envelope> {
        let draft = self.remove(id)?;
        info!("草稿 {} 归类到 {}", id, snapshot.breadcrumb());
        let mut envelope = draft.envelope;
        envelope.meta.hierarchy = Some(snapshot);
        Some(envelope)
    }

    /// 清空全部草稿
    pub fn clear(&mut self) {
        if !self.drafts.is_empty() {
            info!("清空 {} 份草稿", self.drafts.len());
        }
        self.drafts.clear();
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
