use super::{CommonFields, QuestionEditor};
use crate::models::{
    Envelope, ExpressionDetail, ExpressionMode, NumberText, Operation, QuestionBody, QuestionKind,
};

/// 算式编辑器
///
/// 模式为 `blank_result` 时结果随运算数和运算符自动计算；
/// 其他模式保留手动输入的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionEditor {
    common: CommonFields,
    detail: ExpressionDetail,
}

impl ExpressionEditor {
    pub fn detail(&self) -> &ExpressionDetail {
        &self.detail
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.detail.operation = operation;
        self.recompute();
    }

    pub fn set_operand1(&mut self, text: impl Into<String>) {
        self.detail.operand1 = NumberText::new(text);
        self.recompute();
    }

    pub fn set_operand2(&mut self, text: impl Into<String>) {
        self.detail.operand2 = NumberText::new(text);
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: ExpressionMode) {
        self.detail.mode = mode;
        self.recompute();
    }

    /// 手动输入结果，`blank_result` 模式下会被重新计算覆盖
    pub fn set_result(&mut self, text: impl Into<String>) {
        self.detail.result = NumberText::new(text);
        self.recompute();
    }

    fn recompute(&mut self) {
        if self.detail.mode == ExpressionMode::BlankResult {
            self.detail.result = self
                .detail
                .compute()
                .map(NumberText::from_value)
                .unwrap_or_default();
        }
    }
}

impl QuestionEditor for ExpressionEditor {
    const KIND: QuestionKind = QuestionKind::Expression;

    fn from_envelope(envelope: Option<&Envelope>) -> Self {
        if let Some(envelope) = envelope {
            if let QuestionBody::Expression(detail) = &envelope.body {
                return Self {
                    common: CommonFields::from_envelope(envelope),
                    detail: detail.clone(),
                };
            }
        }
        Self {
            common: CommonFields::default(),
            detail: ExpressionDetail {
                operation: Operation::Addition,
                operand1: NumberText::default(),
                operand2: NumberText::default(),
                result: NumberText::default(),
                mode: ExpressionMode::BlankResult,
            },
        }
    }

    fn common(&self) -> &CommonFields {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonFields {
        &mut self.common
    }

    fn body(&self) -> QuestionBody {
        QuestionBody::Expression(self.detail.clone())
    }
}
