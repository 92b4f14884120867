//! 校验分发
//!
//! `validate` 按题型精确匹配到对应的校验函数；
//! `validate_value` 用于未解析的 JSON，未知题型同样作为校验错误返回。

pub mod common;
pub mod kinds;
pub mod messages;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::{Envelope, QuestionBody, ENVELOPE_VERSION};

pub use kinds::{
    unresolved_pairs, validate_expression, validate_fib_single, validate_image_choice,
    validate_matching_pairs, validate_mcq_single, validate_multiple_fill_in,
    validate_vertical_calculation,
};

/// 校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// 编辑器只显示第一条错误
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// 校验信封
pub fn validate(envelope: &Envelope) -> ValidationReport {
    match &envelope.body {
        QuestionBody::McqSingle(d) => validate_mcq_single(envelope, d),
        QuestionBody::FibSingle(d) => validate_fib_single(envelope, d),
        QuestionBody::ImageChoice(d) => validate_image_choice(envelope, d),
        QuestionBody::MultipleFillIn(d) => validate_multiple_fill_in(envelope, d),
        QuestionBody::VerticalCalculation(d) => validate_vertical_calculation(envelope, d),
        QuestionBody::Expression(d) => validate_expression(envelope, d),
        QuestionBody::MatchingPairs(d) => validate_matching_pairs(envelope, d),
    }
}

/// 校验未解析的 JSON 信封
pub fn validate_value(value: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    let structure = common::check_raw_structure(value, &mut errors);
    let Some(kind) = structure.kind else {
        return ValidationReport::from_errors(errors);
    };

    if structure.decodable {
        match serde_json::from_value::<Envelope>(value.clone()) {
            Ok(envelope) => errors.extend(validate(&envelope).errors),
            Err(e) => errors.push(messages::invalid_detail(e)),
        }
        return ValidationReport::from_errors(errors);
    }

    // 外层字段有误时，只要 detail 能解析就继续做题型校验
    let Some(detail) = value.get("detail").filter(|d| d.is_object()) else {
        return ValidationReport::from_errors(errors);
    };
    match QuestionBody::from_parts(kind, detail.clone()) {
        Ok(body) => {
            let envelope = salvage_envelope(value, body);
            for error in validate(&envelope).errors {
                if !errors.contains(&error) {
                    errors.push(error);
                }
            }
        }
        Err(e) => errors.push(messages::invalid_detail(e)),
    }

    ValidationReport::from_errors(errors)
}

/// 用 detail 和可解析的外层字段拼出信封，无法解析的字段取默认值
fn salvage_envelope(value: &Value, body: QuestionBody) -> Envelope {
    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(ENVELOPE_VERSION);
    Envelope {
        version,
        body,
        prompt: lenient(value, "prompt"),
        media: lenient(value, "media"),
        explanation: lenient(value, "explanation"),
        hints: lenient(value, "hints"),
        scoring: lenient(value, "scoring"),
        meta: lenient(value, "meta"),
    }
}

fn lenient<T: DeserializeOwned + Default>(value: &Value, key: &str) -> T {
    value
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value::<Option<T>>(v).ok().flatten())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::messages as msg;
    use super::*;
    use crate::test_support::{envelope, sample_json};
    use crate::models::QuestionKind;
    use serde_json::json;

    #[test]
    fn test_all_samples_are_valid() {
        for kind in QuestionKind::ALL {
            let report = validate(&envelope(kind));
            assert!(report.valid, "{} 应该通过校验: {:?}", kind, report.errors);
            assert!(validate_value(&sample_json(kind)).valid);
        }
    }

    #[test]
    fn test_removing_required_field_fails() {
        let required: [(QuestionKind, &str); 7] = [
            (QuestionKind::McqSingle, "options"),
            (QuestionKind::FibSingle, "answer"),
            (QuestionKind::ImageChoice, "options"),
            (QuestionKind::MultipleFillIn, "answers"),
            (QuestionKind::VerticalCalculation, "layout"),
            (QuestionKind::Expression, "operand2"),
            (QuestionKind::MatchingPairs, "pairs"),
        ];
        for (kind, field) in required {
            let mut value = sample_json(kind);
            value["detail"].as_object_mut().unwrap().remove(field);
            let report = validate_value(&value);
            assert!(!report.valid, "{} 缺少 {} 应该失败", kind, field);
            assert!(!report.errors.is_empty());
        }
    }

    #[test]
    fn test_unknown_kind_is_validation_error() {
        let mut value = sample_json(QuestionKind::FibSingle);
        value["kind"] = json!("essay");
        let report = validate_value(&value);
        assert!(!report.valid);
        assert_eq!(report.errors, vec![msg::unknown_kind("essay")]);
    }

    #[test]
    fn test_raw_structure_errors_are_collected() {
        let value = json!({
            "version": "1",
            "kind": "mcq_single",
            "media": {"url": "x"},
            "scoring": {"full_points": "ten"}
        });
        let report = validate_value(&value);
        assert!(!report.valid);
        assert!(report.errors.contains(&msg::INVALID_VERSION.to_string()));
        assert!(report.errors.contains(&msg::MEDIA_NOT_ARRAY.to_string()));
        assert!(report.errors.contains(&msg::MISSING_DETAIL.to_string()));
        assert!(report.errors.contains(&msg::INVALID_SCORING.to_string()));
        assert!(!validate_value(&json!([1, 2])).valid);
    }

    #[test]
    fn test_detail_checked_despite_outer_errors() {
        let value = json!({
            "version": 1,
            "kind": "mcq_single",
            "prompt": "",
            "media": {"url": "x"},
            "detail": {
                "options": [
                    {"id": "A", "text": "2", "correct": false},
                    {"id": "B", "text": "4", "correct": false}
                ]
            }
        });
        let report = validate_value(&value);
        assert_eq!(
            report.errors,
            vec![
                msg::MEDIA_NOT_ARRAY.to_string(),
                msg::EMPTY_PROMPT.to_string(),
                msg::NO_CORRECT_ANSWER.to_string(),
            ]
        );
    }

    #[test]
    fn test_null_optional_fields_are_valid() {
        let mut value = sample_json(QuestionKind::Expression);
        for key in ["prompt", "media", "hints", "scoring", "explanation"] {
            value[key] = Value::Null;
        }
        let report = validate_value(&value);
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn test_core_checks() {
        let mut env = envelope(QuestionKind::FibSingle);
        env.version = 2;
        env.prompt = "  ".into();
        env.scoring.full_points = 0.0;
        let report = validate(&env);
        assert_eq!(
            report.errors,
            vec![
                msg::INVALID_VERSION.to_string(),
                msg::FULL_POINTS_POSITIVE.to_string(),
                msg::EMPTY_PROMPT.to_string(),
            ]
        );
        assert_eq!(report.first_error(), Some(msg::INVALID_VERSION));
    }

    #[test]
    fn test_prompt_optional_for_arithmetic_kinds() {
        for kind in [QuestionKind::Expression, QuestionKind::VerticalCalculation] {
            let mut env = envelope(kind);
            env.prompt.clear();
            assert!(validate(&env).valid);
        }
    }
}
