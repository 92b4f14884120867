//! 所有题型共用的结构校验

use serde_json::Value;

use super::messages as msg;
use crate::models::{Envelope, QuestionKind, ENVELOPE_VERSION};

/// 信封公共字段：版本、计分、媒体、题干
pub fn check_core(envelope: &Envelope, errors: &mut Vec<String>) {
    if envelope.version != ENVELOPE_VERSION {
        errors.push(msg::INVALID_VERSION.to_string());
    }

    let scoring = &envelope.scoring;
    if !(scoring.full_points.is_finite() && scoring.full_points > 0.0) {
        errors.push(msg::FULL_POINTS_POSITIVE.to_string());
    }
    if !(scoring.partial_points >= 0.0 && scoring.penalty >= 0.0) {
        errors.push(msg::NEGATIVE_POINTS.to_string());
    }

    for (index, media) in envelope.media.iter().enumerate() {
        if media.url.trim().is_empty() {
            errors.push(msg::media_missing_url(index));
        }
    }

    if !envelope.kind().prompt_in_detail() && envelope.prompt.trim().is_empty() {
        errors.push(msg::EMPTY_PROMPT.to_string());
    }
}

/// 结构校验的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStructure {
    /// 识别出的题型
    pub kind: Option<QuestionKind>,
    /// 外层字段全部合法，可以整体解析
    pub decodable: bool,
}

/// 未解析 JSON 的结构校验
pub fn check_raw_structure(value: &Value, errors: &mut Vec<String>) -> RawStructure {
    let Some(object) = value.as_object() else {
        errors.push(msg::INVALID_PAYLOAD.to_string());
        return RawStructure {
            kind: None,
            decodable: false,
        };
    };

    let mut decodable = true;

    // 整数版本号交给类型化校验
    if object.get("version").and_then(Value::as_u64).is_none() {
        errors.push(msg::INVALID_VERSION.to_string());
        decodable = false;
    }

    let kind = match object.get("kind") {
        None | Some(Value::Null) => {
            errors.push(msg::MISSING_KIND.to_string());
            None
        }
        Some(Value::String(tag)) => {
            let kind = QuestionKind::from_tag(tag);
            if kind.is_none() {
                errors.push(msg::unknown_kind(tag));
            }
            kind
        }
        Some(other) => {
            errors.push(msg::unknown_kind(&other.to_string()));
            None
        }
    };
    if kind.is_none() {
        decodable = false;
    }

    match object.get("media") {
        None | Some(Value::Null) | Some(Value::Array(_)) => {}
        Some(_) => {
            errors.push(msg::MEDIA_NOT_ARRAY.to_string());
            decodable = false;
        }
    }

    match object.get("detail") {
        Some(Value::Object(_)) => {}
        _ => {
            errors.push(msg::MISSING_DETAIL.to_string());
            decodable = false;
        }
    }

    match object.get("scoring") {
        None | Some(Value::Null) => {}
        Some(Value::Object(scoring)) if scoring.get("full_points").is_some_and(Value::is_number) => {}
        Some(_) => {
            errors.push(msg::INVALID_SCORING.to_string());
            decodable = false;
        }
    }

    RawStructure { kind, decodable }
}
