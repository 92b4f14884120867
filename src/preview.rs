//! 预览
//!
//! 每种题型一个只读的纯文本渲染，用于人工核对编辑结果

use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

use crate::models::{
    Envelope, ExpressionDetail, ExpressionMode, FibSingleDetail, FillBlock, ImageChoiceDetail,
    MatchingPairsDetail, McqSingleDetail, MultipleFillInDetail, QuestionBody,
    VerticalCalculationDetail,
};

const BLANK: &str = "____";

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"))
}

/// 去掉富文本题干中的 HTML 标签
fn plain_text(html: &str) -> String {
    tag_pattern().replace_all(html, "").trim().to_string()
}

/// 渲染预览
pub fn render_preview(envelope: &Envelope) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}]", envelope.kind().label());

    let prompt = plain_text(&envelope.prompt);
    if !prompt.is_empty() {
        let _ = writeln!(out, "{}", prompt);
    }
    for media in &envelope.media {
        let _ = writeln!(out, "🖼 {} ({})", media.alt, media.url);
    }

    match &envelope.body {
        QuestionBody::McqSingle(d) => render_mcq_single(&mut out, d),
        QuestionBody::FibSingle(d) => render_fib_single(&mut out, d),
        QuestionBody::ImageChoice(d) => render_image_choice(&mut out, d),
        QuestionBody::MultipleFillIn(d) => render_multiple_fill_in(&mut out, d),
        QuestionBody::VerticalCalculation(d) => render_vertical_calculation(&mut out, d),
        QuestionBody::Expression(d) => render_expression(&mut out, d),
        QuestionBody::MatchingPairs(d) => render_matching_pairs(&mut out, d),
    }

    if let Some(explanation) = &envelope.explanation {
        let _ = writeln!(out, "Giải thích: {}", plain_text(explanation));
    }
    for hint in &envelope.hints {
        let _ = writeln!(out, "Gợi ý: {}", hint);
    }
    out
}

fn mark(correct: bool) -> &'static str {
    if correct {
        "✓"
    } else {
        " "
    }
}

fn render_mcq_single(out: &mut String, d: &McqSingleDetail) {
    for option in &d.options {
        let _ = writeln!(out, "[{}] {}. {}", mark(option.correct), option.id, option.text);
    }
}

fn render_fib_single(out: &mut String, d: &FibSingleDetail) {
    let _ = writeln!(out, "Đáp án: {}", d.answer);
}

fn render_image_choice(out: &mut String, d: &ImageChoiceDetail) {
    for option in &d.options {
        let _ = writeln!(
            out,
            "[{}] {}. {} ({})",
            mark(option.correct),
            option.id,
            option.image.alt,
            option.image.url
        );
    }
}

fn render_multiple_fill_in(out: &mut String, d: &MultipleFillInDetail) {
    let mut line = String::new();
    for block in &d.blocks {
        match block {
            FillBlock::Text { value } => line.push_str(value),
            FillBlock::Blank { .. } => line.push_str(BLANK),
            FillBlock::Image { alt, .. } => {
                let _ = write!(line, "[🖼 {}]", alt);
            }
        }
    }
    if !line.is_empty() {
        let _ = writeln!(out, "{}", line);
    }
    for answer in &d.answers {
        let _ = writeln!(out, "{} = {}", answer.id, answer.expression);
    }
}

fn render_vertical_calculation(out: &mut String, d: &VerticalCalculationDetail) {
    let rows = &d.layout.rows;
    let width = rows
        .iter()
        .map(|r| r.as_str().chars().count())
        .chain(std::iter::once(d.result.as_str().chars().count()))
        .max()
        .unwrap_or(0);

    for (index, row) in rows.iter().enumerate() {
        let symbol = match index {
            0 => " ",
            _ => d
                .layout
                .operator_at(index - 1)
                .map(|op| op.symbol())
                .unwrap_or("?"),
        };
        let _ = writeln!(out, "{} {:>width$}", symbol, row.as_str(), width = width);
    }
    let _ = writeln!(out, "  {}", "-".repeat(width));
    let _ = writeln!(out, "  {:>width$}", d.result.as_str(), width = width);
}

fn render_expression(out: &mut String, d: &ExpressionDetail) {
    let shown = |value: &str, hidden: bool| if hidden { BLANK.to_string() } else { value.to_string() };
    let _ = writeln!(
        out,
        "{} {} {} = {}",
        shown(d.operand1.as_str(), d.mode == ExpressionMode::BlankOperand1),
        d.operation.symbol(),
        shown(d.operand2.as_str(), d.mode == ExpressionMode::BlankOperand2),
        shown(d.result.as_str(), d.mode == ExpressionMode::BlankResult),
    );
}

fn render_matching_pairs(out: &mut String, d: &MatchingPairsDetail) {
    let label = |column: usize, id: &str| -> String {
        d.columns
            .get(column)
            .and_then(|c| c.items.iter().find(|i| i.id == id))
            .map(|i| i.text.clone())
            .unwrap_or_else(|| format!("?{}", id))
    };
    for pair in &d.pairs {
        let _ = writeln!(out, "{} ⟷ {}", label(0, &pair.left), label(1, &pair.right));
    }
}
