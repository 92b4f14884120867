//! 信封工厂
//!
//! 由题型数据构建完整的信封，补齐默认值

use crate::models::{Envelope, Media, Meta, QuestionBody, Scoring, ENVELOPE_VERSION};

/// 可覆盖的信封字段，`Some` 的字段覆盖默认值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvelopeExtras {
    pub version: Option<u32>,
    pub media: Option<Vec<Media>>,
    pub explanation: Option<String>,
    pub hints: Option<Vec<String>>,
    pub scoring: Option<Scoring>,
    pub meta: Option<Meta>,
}

/// 构建信封
///
/// 默认值：`version = 1`、空 `media` / `hints`、默认计分、空 `meta`
pub fn make_envelope(
    body: QuestionBody,
    prompt: impl Into<String>,
    extras: EnvelopeExtras,
) -> Envelope {
    Envelope {
        version: extras.version.unwrap_or(ENVELOPE_VERSION),
        body,
        prompt: prompt.into(),
        media: extras.media.unwrap_or_default(),
        explanation: extras.explanation,
        hints: extras.hints.unwrap_or_default(),
        scoring: extras.scoring.unwrap_or_default(),
        meta: extras.meta.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FibSingleDetail;

    fn fib() -> QuestionBody {
        QuestionBody::FibSingle(FibSingleDetail {
            answer: "4".into(),
            case_sensitive: false,
            normalize_space: true,
        })
    }

    #[test]
    fn test_defaults() {
        let envelope = make_envelope(fib(), "2 + 2 = ?", EnvelopeExtras::default());
        assert_eq!(envelope.version, 1);
        assert!(envelope.media.is_empty());
        assert!(envelope.hints.is_empty());
        assert_eq!(envelope.scoring.full_points, 1.0);
        assert_eq!(envelope.explanation, None);
    }

    #[test]
    fn test_extras_override() {
        let extras = EnvelopeExtras {
            version: Some(2),
            hints: Some(vec!["Đếm ngón tay".into()]),
            scoring: Some(Scoring {
                full_points: 5.0,
                partial_points: 1.0,
                penalty: 0.5,
            }),
            ..Default::default()
        };
        let envelope = make_envelope(fib(), "2 + 2 = ?", extras);
        assert_eq!(envelope.version, 2);
        assert_eq!(envelope.hints, vec!["Đếm ngón tay".to_string()]);
        assert_eq!(envelope.scoring.full_points, 5.0);
    }
}
