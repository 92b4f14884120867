//! 后端保存的题目记录

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Envelope, QuestionKind};

/// 题目记录，`payload` 为信封 JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: i64,
    #[serde(default)]
    pub subtopic_id: Option<i64>,
    pub payload: Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl QuestionRecord {
    /// 解析 payload 为信封
    pub fn envelope(&self) -> serde_json::Result<Envelope> {
        serde_json::from_value(self.payload.clone())
    }
}

/// 题目搜索条件
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic_id: Option<i64>,
}

impl QuestionFilter {
    /// 转换为查询参数
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(kind) = self.kind {
            pairs.push(("kind", kind.tag().to_string()));
        }
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            pairs.push(("keyword", keyword.to_string()));
        }
        let ids = [
            ("gradeId", self.grade_id),
            ("subjectId", self.subject_id),
            ("topicId", self.topic_id),
            ("subtopicId", self.subtopic_id),
        ];
        for (key, id) in ids {
            if let Some(id) = id {
                pairs.push((key, id.to_string()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_json;

    #[test]
    fn test_record_payload_decodes() {
        let record: QuestionRecord = serde_json::from_value(serde_json::json!({
            "id": 42,
            "subtopicId": 7,
            "payload": sample_json(QuestionKind::Expression),
        }))
        .unwrap();
        assert_eq!(record.envelope().unwrap().kind(), QuestionKind::Expression);
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = QuestionFilter {
            kind: Some(QuestionKind::McqSingle),
            keyword: Some("  ".into()),
            topic_id: Some(3),
            ..Default::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![("kind", "mcq_single".to_string()), ("topicId", "3".to_string())]
        );
    }
}
