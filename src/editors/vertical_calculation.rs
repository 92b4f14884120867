//! 竖式计算编辑器
//!
//! 支持 2 或 3 项；混合模式下每两项之间单独选择运算符。
//! 前两项都已填写时自动重新计算结果。

use super::{CommonFields, QuestionEditor};
use crate::models::{
    Envelope, NumberText, Operation, QuestionBody, QuestionKind, VerticalCalculationDetail,
    VerticalLayout, VerticalMode,
};

pub const MIN_TERMS: usize = 2;
pub const MAX_TERMS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalCalculationEditor {
    common: CommonFields,
    rows: Vec<NumberText>,
    operator: Operation,
    operators: Vec<Operation>,
    mode: VerticalMode,
    result: NumberText,
}

impl VerticalCalculationEditor {
    pub fn rows(&self) -> &[NumberText] {
        &self.rows
    }

    pub fn result(&self) -> &NumberText {
        &self.result
    }

    pub fn set_row(&mut self, index: usize, text: impl Into<String>) {
        if let Some(row) = self.rows.get_mut(index) {
            *row = NumberText::new(text);
            self.recompute();
        }
    }

    /// 设置项数（2 或 3），混合模式下同步增减运算符
    pub fn set_term_count(&mut self, count: usize) {
        let count = count.clamp(MIN_TERMS, MAX_TERMS);
        self.rows.resize_with(count, NumberText::default);
        if self.mode == VerticalMode::Mixed {
            let operator = self.operator;
            self.operators.resize(count.saturating_sub(1), operator);
        }
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: VerticalMode) {
        self.mode = mode;
        if mode == VerticalMode::Mixed {
            let operator = self.operator;
            self.operators.resize(self.rows.len().saturating_sub(1), operator);
        }
        self.recompute();
    }

    /// 单一模式下的运算符
    pub fn set_operator(&mut self, operator: Operation) {
        self.operator = operator;
        self.recompute();
    }

    /// 混合模式下第 `gap` 个运算符
    pub fn set_operator_at(&mut self, gap: usize, operator: Operation) {
        if let Some(slot) = self.operators.get_mut(gap) {
            *slot = operator;
            self.recompute();
        }
    }

    /// 手动输入结果（下次重新计算时会被覆盖）
    pub fn set_result(&mut self, text: impl Into<String>) {
        self.result = NumberText::new(text);
    }

    fn layout(&self) -> VerticalLayout {
        match self.mode {
            VerticalMode::Single => VerticalLayout {
                rows: self.rows.clone(),
                operator: Some(self.operator),
                operators: Vec::new(),
                mode: VerticalMode::Single,
            },
            VerticalMode::Mixed => VerticalLayout {
                rows: self.rows.clone(),
                operator: None,
                operators: self.operators.clone(),
                mode: VerticalMode::Mixed,
            },
        }
    }

    /// 只计算开头已填写的若干项
    fn recompute(&mut self) {
        if self.rows.iter().take(2).any(NumberText::is_blank) {
            return;
        }
        let mut layout = self.layout();
        let filled = layout.rows.iter().take_while(|r| !r.is_blank()).count();
        layout.rows.truncate(filled);
        self.result = layout
            .evaluate()
            .map(NumberText::from_value)
            .unwrap_or_default();
    }
}

impl QuestionEditor for VerticalCalculationEditor {
    const KIND: QuestionKind = QuestionKind::VerticalCalculation;

    fn from_envelope(envelope: Option<&Envelope>) -> Self {
        if let Some(envelope) = envelope {
            if let QuestionBody::VerticalCalculation(detail) = &envelope.body {
                let layout = &detail.layout;
                let mut rows = layout.rows.clone();
                // 编辑器至少显示两项
                if rows.len() < MIN_TERMS {
                    rows.resize_with(MIN_TERMS, NumberText::default);
                }
                return Self {
                    common: CommonFields::from_envelope(envelope),
                    rows,
                    operator: layout
                        .operator
                        .or_else(|| layout.operators.first().copied())
                        .unwrap_or(Operation::Addition),
                    operators: layout.operators.clone(),
                    mode: layout.mode,
                    result: detail.result.clone(),
                };
            }
        }
        Self {
            common: CommonFields::default(),
            rows: vec![NumberText::default(); MIN_TERMS],
            operator: Operation::Addition,
            operators: Vec::new(),
            mode: VerticalMode::Single,
            result: NumberText::default(),
        }
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn body(&self) -> QuestionBody {
        QuestionBody::VerticalCalculation(VerticalCalculationDetail {
            layout: self.layout(),
            result: self.result.clone(),
        })
    }
}
