//! 各题型的校验规则
//!
//! 每个函数都会先执行公共结构校验，再检查本题型的规则，错误全部收集

use std::collections::HashSet;

use super::common::check_core;
use super::messages as msg;
use super::ValidationReport;
use crate::models::{
    Envelope, ExpressionDetail, FibSingleDetail, ImageChoiceDetail, MatchPair, MatchingPairsDetail,
    McqSingleDetail, MultipleFillInDetail, Operation, VerticalCalculationDetail, VerticalMode,
};

/// 选项ID非空且不重复
fn check_ids<'a>(ids: impl Iterator<Item = &'a str>, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if id.trim().is_empty() {
            errors.push(msg::option_missing_id(index));
        } else if !seen.insert(id) {
            errors.push(msg::duplicate_id(id));
        }
    }
}

/// 正好一个正确答案
fn check_single_correct(correct_count: usize, errors: &mut Vec<String>) {
    match correct_count {
        0 => errors.push(msg::NO_CORRECT_ANSWER.to_string()),
        1 => {}
        _ => errors.push(msg::MULTIPLE_CORRECT_ANSWERS.to_string()),
    }
}

pub fn validate_mcq_single(envelope: &Envelope, detail: &McqSingleDetail) -> ValidationReport {
    let mut errors = Vec::new();
    check_core(envelope, &mut errors);

    if detail.options.len() < 2 {
        errors.push(msg::MIN_TWO_OPTIONS.to_string());
    }
    check_ids(detail.options.iter().map(|o| o.id.as_str()), &mut errors);
    for option in &detail.options {
        if option.text.trim().is_empty() {
            errors.push(msg::option_empty_text(&option.id));
        }
    }
    check_single_correct(
        detail.options.iter().filter(|o| o.correct).count(),
        &mut errors,
    );

    ValidationReport::from_errors(errors)
}

pub fn validate_fib_single(envelope: &Envelope, detail: &FibSingleDetail) -> ValidationReport {
    let mut errors = Vec::new();
    check_core(envelope, &mut errors);

    if detail.answer.trim().is_empty() {
        errors.push(msg::EMPTY_ANSWER.to_string());
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_image_choice(envelope: &Envelope, detail: &ImageChoiceDetail) -> ValidationReport {
    let mut errors = Vec::new();
    check_core(envelope, &mut errors);

    if detail.options.len() < 2 {
        errors.push(msg::MIN_TWO_IMAGES.to_string());
    }
    check_ids(detail.options.iter().map(|o| o.id.as_str()), &mut errors);
    for option in &detail.options {
        if option.image.url.trim().is_empty() {
            errors.push(msg::option_missing_image(&option.id));
        }
    }
    check_single_correct(
        detail.options.iter().filter(|o| o.correct).count(),
        &mut errors,
    );

    ValidationReport::from_errors(errors)
}

pub fn validate_multiple_fill_in(
    envelope: &Envelope,
    detail: &MultipleFillInDetail,
) -> ValidationReport {
    let mut errors = Vec::new();
    check_core(envelope, &mut errors);

    if detail.answers.len() < 2 {
        errors.push(msg::MIN_TWO_ANSWERS.to_string());
    }
    check_ids(detail.answers.iter().map(|a| a.id.as_str()), &mut errors);
    for answer in &detail.answers {
        if answer.expression.trim().is_empty() {
            errors.push(msg::blank_answer_empty(&answer.id));
        }
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_vertical_calculation(
    envelope: &Envelope,
    detail: &VerticalCalculationDetail,
) -> ValidationReport {
    let mut errors = Vec::new();
    check_core(envelope, &mut errors);

    let layout = &detail.layout;
    if layout.rows.len() < 2 {
        errors.push(msg::MIN_TWO_ROWS.to_string());
    }
    for (index, row) in layout.rows.iter().enumerate() {
        if !row.is_numeric() {
            errors.push(msg::row_not_numeric(index));
        }
    }

    let gaps = layout.rows.len().saturating_sub(1);
    match layout.mode {
        VerticalMode::Single => {
            if layout.operator.is_none() {
                errors.push(msg::MISSING_OPERATOR.to_string());
            }
        }
        VerticalMode::Mixed => {
            if layout.operators.len() != gaps {
                errors.push(msg::operator_count_mismatch(gaps, layout.operators.len()));
            }
        }
    }

    let divides_by_zero = layout.rows.iter().enumerate().skip(1).any(|(index, row)| {
        layout.operator_at(index - 1) == Some(Operation::Division) && row.value() == Some(0.0)
    });
    if divides_by_zero {
        errors.push(msg::DIVISION_BY_ZERO.to_string());
    }

    if !detail.result.is_numeric() {
        errors.push(msg::RESULT_NOT_NUMERIC.to_string());
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_expression(envelope: &Envelope, detail: &ExpressionDetail) -> ValidationReport {
    let mut errors = Vec::new();
    check_core(envelope, &mut errors);

    if !detail.operand1.is_numeric() {
        errors.push(msg::OPERAND1_NOT_NUMERIC.to_string());
    }
    if !detail.operand2.is_numeric() {
        errors.push(msg::OPERAND2_NOT_NUMERIC.to_string());
    }
    if detail.operation == Operation::Division && detail.operand2.value() == Some(0.0) {
        errors.push(msg::DIVISION_BY_ZERO.to_string());
    }
    if !detail.result.is_numeric() {
        errors.push(msg::RESULT_NOT_NUMERIC.to_string());
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_matching_pairs(
    envelope: &Envelope,
    detail: &MatchingPairsDetail,
) -> ValidationReport {
    let mut errors = Vec::new();
    check_core(envelope, &mut errors);

    if detail.columns.len() != 2 {
        errors.push(msg::EXACTLY_TWO_COLUMNS.to_string());
    }
    for (index, column) in detail.columns.iter().enumerate() {
        if column.items.len() < 2 {
            errors.push(msg::column_min_items(index));
        }
        check_ids(column.items.iter().map(|i| i.id.as_str()), &mut errors);
        for item in &column.items {
            let has_image = item
                .image
                .as_ref()
                .is_some_and(|img| !img.url.trim().is_empty());
            if item.text.trim().is_empty() && !has_image {
                errors.push(msg::item_empty(index, &item.id));
            }
        }
    }

    if detail.pairs.is_empty() {
        errors.push(msg::MIN_ONE_PAIR.to_string());
    }

    ValidationReport::from_errors(errors)
}

/// 引用了不存在的项目ID的配对
///
/// 不影响校验结果，只用于提示
pub fn unresolved_pairs(detail: &MatchingPairsDetail) -> Vec<&MatchPair> {
    let left = column_ids(detail, 0);
    let right = column_ids(detail, 1);

    detail
        .pairs
        .iter()
        .filter(|p| !left.contains(p.left.as_str()) || !right.contains(p.right.as_str()))
        .collect()
}

fn column_ids(detail: &MatchingPairsDetail, column: usize) -> HashSet<&str> {
    detail
        .columns
        .get(column)
        .map(|c| c.items.iter().map(|i| i.id.as_str()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NumberText, QuestionBody, QuestionKind};
    use crate::test_support::envelope;
    use crate::validation::validate;

    fn with_body(kind: QuestionKind, edit: impl FnOnce(&mut QuestionBody)) -> ValidationReport {
        let mut env = envelope(kind);
        edit(&mut env.body);
        validate(&env)
    }

    #[test]
    fn test_mcq_requires_exactly_one_correct() {
        let none = with_body(QuestionKind::McqSingle, |b| {
            if let QuestionBody::McqSingle(d) = b {
                d.options.iter_mut().for_each(|o| o.correct = false);
            }
        });
        assert!(!none.valid);
        assert!(none.errors.contains(&msg::NO_CORRECT_ANSWER.to_string()));

        let both = with_body(QuestionKind::McqSingle, |b| {
            if let QuestionBody::McqSingle(d) = b {
                d.options.iter_mut().for_each(|o| o.correct = true);
            }
        });
        assert!(both.errors.contains(&msg::MULTIPLE_CORRECT_ANSWERS.to_string()));
    }

    #[test]
    fn test_mcq_option_rules() {
        let report = with_body(QuestionKind::McqSingle, |b| {
            if let QuestionBody::McqSingle(d) = b {
                d.options.truncate(1);
                d.options[0].text.clear();
                d.options[0].correct = true;
            }
        });
        assert_eq!(
            report.errors,
            vec![msg::MIN_TWO_OPTIONS.to_string(), msg::option_empty_text("A")]
        );

        let dup = with_body(QuestionKind::McqSingle, |b| {
            if let QuestionBody::McqSingle(d) = b {
                d.options[1].id = "A".into();
            }
        });
        assert_eq!(dup.errors, vec![msg::duplicate_id("A")]);
    }

    #[test]
    fn test_image_choice_rules() {
        let report = with_body(QuestionKind::ImageChoice, |b| {
            if let QuestionBody::ImageChoice(d) = b {
                d.options[1].image.url.clear();
                d.options[1].correct = true;
            }
        });
        assert!(!report.valid);
        assert!(report.errors.contains(&msg::option_missing_image("B")));
        assert!(report.errors.contains(&msg::MULTIPLE_CORRECT_ANSWERS.to_string()));

        let none = with_body(QuestionKind::ImageChoice, |b| {
            if let QuestionBody::ImageChoice(d) = b {
                d.options[0].correct = false;
            }
        });
        assert_eq!(none.errors, vec![msg::NO_CORRECT_ANSWER.to_string()]);
    }

    #[test]
    fn test_fib_answer_required() {
        let report = with_body(QuestionKind::FibSingle, |b| {
            if let QuestionBody::FibSingle(d) = b {
                d.answer = "   ".into();
            }
        });
        assert_eq!(report.errors, vec![msg::EMPTY_ANSWER.to_string()]);
    }

    #[test]
    fn test_multiple_fill_in_answers() {
        let report = with_body(QuestionKind::MultipleFillIn, |b| {
            if let QuestionBody::MultipleFillIn(d) = b {
                d.answers.truncate(1);
                d.answers[0].expression.clear();
            }
        });
        assert_eq!(
            report.errors,
            vec![msg::MIN_TWO_ANSWERS.to_string(), msg::blank_answer_empty("b1")]
        );
    }

    #[test]
    fn test_vertical_rows_and_operators() {
        let report = with_body(QuestionKind::VerticalCalculation, |b| {
            if let QuestionBody::VerticalCalculation(d) = b {
                d.layout.rows = vec![NumberText::from("12"), NumberText::from("x")];
            }
        });
        assert_eq!(report.errors, vec![msg::row_not_numeric(1)]);

        let mixed = with_body(QuestionKind::VerticalCalculation, |b| {
            if let QuestionBody::VerticalCalculation(d) = b {
                d.layout.mode = VerticalMode::Mixed;
                d.layout.rows.push(NumberText::from("3"));
                d.layout.operators = vec![Operation::Addition];
            }
        });
        assert_eq!(mixed.errors, vec![msg::operator_count_mismatch(2, 1)]);

        let single_row = with_body(QuestionKind::VerticalCalculation, |b| {
            if let QuestionBody::VerticalCalculation(d) = b {
                d.layout.rows.truncate(1);
            }
        });
        assert!(single_row.errors.contains(&msg::MIN_TWO_ROWS.to_string()));
    }

    #[test]
    fn test_vertical_division_by_zero() {
        let report = with_body(QuestionKind::VerticalCalculation, |b| {
            if let QuestionBody::VerticalCalculation(d) = b {
                d.layout.operator = Some(Operation::Division);
                d.layout.rows[1] = NumberText::from("0");
            }
        });
        assert!(report.errors.contains(&msg::DIVISION_BY_ZERO.to_string()));
    }

    #[test]
    fn test_expression_division_by_zero_regardless_of_other_fields() {
        for (operand1, result) in [("12", "3"), ("abc", ""), ("0", "0")] {
            let report = with_body(QuestionKind::Expression, |b| {
                if let QuestionBody::Expression(d) = b {
                    d.operation = Operation::Division;
                    d.operand1 = NumberText::from(operand1);
                    d.operand2 = NumberText::from("0");
                    d.result = NumberText::from(result);
                }
            });
            assert!(!report.valid);
            assert!(report.errors.contains(&msg::DIVISION_BY_ZERO.to_string()));
        }
    }

    #[test]
    fn test_expression_numeric_fields() {
        let report = with_body(QuestionKind::Expression, |b| {
            if let QuestionBody::Expression(d) = b {
                d.operation = Operation::Addition;
                d.operand1 = NumberText::from("một");
                d.result = NumberText::default();
            }
        });
        assert_eq!(
            report.errors,
            vec![
                msg::OPERAND1_NOT_NUMERIC.to_string(),
                msg::RESULT_NOT_NUMERIC.to_string()
            ]
        );
    }

    #[test]
    fn test_matching_columns_and_pairs() {
        let report = with_body(QuestionKind::MatchingPairs, |b| {
            if let QuestionBody::MatchingPairs(d) = b {
                d.columns.truncate(1);
                d.pairs.clear();
            }
        });
        assert_eq!(
            report.errors,
            vec![msg::EXACTLY_TWO_COLUMNS.to_string(), msg::MIN_ONE_PAIR.to_string()]
        );

        let few_items = with_body(QuestionKind::MatchingPairs, |b| {
            if let QuestionBody::MatchingPairs(d) = b {
                d.columns[1].items.pop();
            }
        });
        assert_eq!(few_items.errors, vec![msg::column_min_items(1)]);
    }

    #[test]
    fn test_dangling_pair_is_reported_but_valid() {
        let mut env = envelope(QuestionKind::MatchingPairs);
        if let QuestionBody::MatchingPairs(d) = &mut env.body {
            d.pairs.push(MatchPair {
                left: "l1".into(),
                right: "r9".into(),
            });
        }
        assert!(validate(&env).valid);
        if let QuestionBody::MatchingPairs(d) = &env.body {
            let dangling = unresolved_pairs(d);
            assert_eq!(dangling.len(), 1);
            assert_eq!(dangling[0].right, "r9");
        }
    }
}
