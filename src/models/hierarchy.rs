//! 课程层级：年级 → 学科 → 主题 → 子主题

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub grade_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub subject_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTopic {
    pub id: i64,
    pub title: String,
    pub topic_id: i64,
}

/// 保存到题目 meta 中的层级快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySnapshot {
    pub grade_id: i64,
    pub grade_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub topic_id: i64,
    pub topic_title: String,
    pub subtopic_id: i64,
    pub subtopic_title: String,
}

impl HierarchySnapshot {
    pub fn new(grade: &Grade, subject: &Subject, topic: &Topic, subtopic: &SubTopic) -> Self {
        Self {
            grade_id: grade.id,
            grade_name: grade.name.clone(),
            subject_id: subject.id,
            subject_name: subject.name.clone(),
            topic_id: topic.id,
            topic_title: topic.title.clone(),
            subtopic_id: subtopic.id,
            subtopic_title: subtopic.title.clone(),
        }
    }

    /// 面包屑形式，用于日志
    pub fn breadcrumb(&self) -> String {
        format!(
            "{} › {} › {} › {}",
            self.grade_name, self.subject_name, self.topic_title, self.subtopic_title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_keys() {
        let snapshot = HierarchySnapshot::new(
            &Grade { id: 1, name: "Lớp 1".into() },
            &Subject { id: 2, name: "Toán".into(), grade_id: 1 },
            &Topic { id: 3, title: "Phép cộng".into(), subject_id: 2 },
            &SubTopic { id: 4, title: "Cộng trong phạm vi 10".into(), topic_id: 3 },
        );
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["gradeId"], 1);
        assert_eq!(value["subtopicTitle"], "Cộng trong phạm vi 10");
        assert_eq!(snapshot.breadcrumb(), "Lớp 1 › Toán › Phép cộng › Cộng trong phạm vi 10");
    }
}
