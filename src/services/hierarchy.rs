//! 课程层级级联选择
//!
//! 年级 → 学科 → 主题 → 子主题，每一级按上一级 id 加载。
//! 更改上级选择会清空所有下级选择和候选列表。

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{Grade, HierarchySnapshot, SubTopic, Subject, Topic};

/// 层级数据来源
#[async_trait]
pub trait HierarchySource: Sync {
    async fn list_grades(&self) -> AppResult<Vec<Grade>>;
    async fn list_subjects(&self, grade_id: i64) -> AppResult<Vec<Subject>>;
    async fn list_topics(&self, subject_id: i64) -> AppResult<Vec<Topic>>;
    async fn list_subtopics(&self, topic_id: i64) -> AppResult<Vec<SubTopic>>;
}

/// 级联选择状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchySelection {
    pub grades: Vec<Grade>,
    pub subjects: Vec<Subject>,
    pub topics: Vec<Topic>,
    pub subtopics: Vec<SubTopic>,
    grade: Option<Grade>,
    subject: Option<Subject>,
    topic: Option<Topic>,
    subtopic: Option<SubTopic>,
}

impl HierarchySelection {
    pub fn grade(&self) -> Option<&Grade> {
        self.grade.as_ref()
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn subtopic(&self) -> Option<&SubTopic> {
        self.subtopic.as_ref()
    }

    /// 选择年级，返回是否找到
    pub fn select_grade(&mut self, grade_id: i64) -> bool {
        let Some(grade) = self.grades.iter().find(|g| g.id == grade_id).cloned() else {
            return false;
        };
        self.grade = Some(grade);
        self.subjects.clear();
        self.clear_from_subject();
        true
    }

    pub fn select_subject(&mut self, subject_id: i64) -> bool {
        let Some(subject) = self.subjects.iter().find(|s| s.id == subject_id).cloned() else {
            return false;
        };
        self.clear_from_subject();
        self.subject = Some(subject);
        true
    }

    pub fn select_topic(&mut self, topic_id: i64) -> bool {
        let Some(topic) = self.topics.iter().find(|t| t.id == topic_id).cloned() else {
            return false;
        };
        self.clear_from_topic();
        self.topic = Some(topic);
        true
    }

    pub fn select_subtopic(&mut self, subtopic_id: i64) -> bool {
        let Some(subtopic) = self.subtopics.iter().find(|s| s.id == subtopic_id).cloned() else {
            return false;
        };
        self.subtopic = Some(subtopic);
        true
    }

    /// 四级全部选定时返回快照
    pub fn snapshot(&self) -> Option<HierarchySnapshot> {
        Some(HierarchySnapshot::new(
            self.grade.as_ref()?,
            self.subject.as_ref()?,
            self.topic.as_ref()?,
            self.subtopic.as_ref()?,
        ))
    }

    fn clear_from_subject(&mut self) {
        self.subject = None;
        self.topics.clear();
        self.clear_from_topic();
    }

    fn clear_from_topic(&mut self) {
        self.topic = None;
        self.subtopics.clear();
        self.subtopic = None;
    }
}

/// 通过后端加载各级候选
pub struct HierarchyService<'a, S: HierarchySource + ?Sized> {
    source: &'a S,
}

impl<'a, S: HierarchySource + ?Sized> HierarchyService<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// 重新加载年级列表，清空所有选择
    pub async fn load_grades(&self, selection: &mut HierarchySelection) -> AppResult<()> {
        let grades = self.source.list_grades().await?;
        debug!("加载到 {} 个年级", grades.len());
        *selection = HierarchySelection {
            grades,
            ..Default::default()
        };
        Ok(())
    }

    pub async fn choose_grade(
        &self,
        selection: &mut HierarchySelection,
        grade_id: i64,
    ) -> AppResult<()> {
        if !selection.select_grade(grade_id) {
            return Err(not_found("grade", grade_id));
        }
        selection.subjects = self.source.list_subjects(grade_id).await?;
        Ok(())
    }

    pub async fn choose_subject(
        &self,
        selection: &mut HierarchySelection,
        subject_id: i64,
    ) -> AppResult<()> {
        if !selection.select_subject(subject_id) {
            return Err(not_found("subject", subject_id));
        }
        selection.topics = self.source.list_topics(subject_id).await?;
        Ok(())
    }

    pub async fn choose_topic(
        &self,
        selection: &mut HierarchySelection,
        topic_id: i64,
    ) -> AppResult<()> {
        if !selection.select_topic(topic_id) {
            return Err(not_found("topic", topic_id));
        }
        selection.subtopics = self.source.list_subtopics(topic_id).await?;
        Ok(())
    }

    /// 在整棵树中查找子主题并构造快照
    ///
    /// 逐级遍历，请求数与树的大小成正比，只用于批量提交时补全 meta
    pub async fn resolve_subtopic(&self, subtopic_id: i64) -> AppResult<Option<HierarchySnapshot>> {
        for grade in self.source.list_grades().await? {
            for subject in self.source.list_subjects(grade.id).await? {
                for topic in self.source.list_topics(subject.id).await? {
                    let subtopics = self.source.list_subtopics(topic.id).await?;
                    if let Some(subtopic) = subtopics.iter().find(|s| s.id == subtopic_id) {
                        let snapshot = HierarchySnapshot::new(&grade, &subject, &topic, subtopic);
                        info!("✓ 子主题 {} 位于 {}", subtopic_id, snapshot.breadcrumb());
                        return Ok(Some(snapshot));
                    }
                }
            }
        }
        Ok(None)
    }
}

fn not_found(level: &str, id: i64) -> AppError {
    AppError::Validation(vec![format!("Lựa chọn {} #{} không hợp lệ", level, id)])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTree;

    #[async_trait]
    impl HierarchySource for FakeTree {
        async fn list_grades(&self) -> AppResult<Vec<Grade>> {
            Ok(vec![
                Grade { id: 1, name: "Lớp 1".into() },
                Grade { id: 2, name: "Lớp 2".into() },
            ])
        }

        async fn list_subjects(&self, grade_id: i64) -> AppResult<Vec<Subject>> {
            Ok(vec![Subject {
                id: grade_id * 10,
                name: format!("Toán {}", grade_id),
                grade_id,
            }])
        }

        async fn list_topics(&self, subject_id: i64) -> AppResult<Vec<Topic>> {
            Ok(vec![Topic {
                id: subject_id * 10,
                title: "Số học".into(),
                subject_id,
            }])
        }

        async fn list_subtopics(&self, topic_id: i64) -> AppResult<Vec<SubTopic>> {
            Ok(vec![SubTopic {
                id: topic_id * 10,
                title: "Phép cộng".into(),
                topic_id,
            }])
        }
    }

    #[tokio::test]
    async fn test_cascade_to_snapshot() {
        let service = HierarchyService::new(&FakeTree);
        let mut selection = HierarchySelection::default();
        service.load_grades(&mut selection).await.unwrap();
        service.choose_grade(&mut selection, 2).await.unwrap();
        service.choose_subject(&mut selection, 20).await.unwrap();
        assert!(selection.snapshot().is_none());
        service.choose_topic(&mut selection, 200).await.unwrap();
        assert!(selection.select_subtopic(2000));

        let snapshot = selection.snapshot().unwrap();
        assert_eq!(snapshot.grade_name, "Lớp 2");
        assert_eq!(snapshot.subtopic_id, 2000);
    }

    #[tokio::test]
    async fn test_changing_grade_clears_descendants() {
        let service = HierarchyService::new(&FakeTree);
        let mut selection = HierarchySelection::default();
        service.load_grades(&mut selection).await.unwrap();
        service.choose_grade(&mut selection, 1).await.unwrap();
        service.choose_subject(&mut selection, 10).await.unwrap();
        service.choose_topic(&mut selection, 100).await.unwrap();

        service.choose_grade(&mut selection, 2).await.unwrap();
        assert!(selection.subject().is_none());
        assert!(selection.topic().is_none());
        assert!(selection.topics.is_empty());
        assert!(selection.subtopics.is_empty());
        assert_eq!(selection.subjects[0].grade_id, 2);
    }

    #[tokio::test]
    async fn test_unknown_choice_is_rejected() {
        let service = HierarchyService::new(&FakeTree);
        let mut selection = HierarchySelection::default();
        service.load_grades(&mut selection).await.unwrap();
        assert!(service.choose_grade(&mut selection, 99).await.is_err());
        assert!(selection.grade().is_none());
    }

    #[tokio::test]
    async fn test_resolve_subtopic() {
        let service = HierarchyService::new(&FakeTree);
        let snapshot = service.resolve_subtopic(1000).await.unwrap().unwrap();
        assert_eq!(snapshot.topic_id, 100);
        assert!(service.resolve_subtopic(5).await.unwrap().is_none());
    }
}
