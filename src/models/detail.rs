//! 各题型的 detail 数据结构

use serde::{Deserialize, Serialize};

use super::kind::Operation;
use super::number_text::NumberText;

fn default_true() -> bool {
    true
}

/// 图片引用，`url` 在上传前可能是 `blob:` 本地引用
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

// ========== mcq_single ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqSingleDetail {
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub shuffle: bool,
}

// ========== fib_single ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibSingleDetail {
    pub answer: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_true")]
    pub normalize_space: bool,
}

// ========== image_choice ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOption {
    pub id: String,
    pub image: ImageRef,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageChoiceDetail {
    pub options: Vec<ImageOption>,
    #[serde(default)]
    pub shuffle: bool,
}

// ========== multiple_fill_in ==========

/// 多空填空题的内容块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FillBlock {
    Text {
        value: String,
    },
    Blank {
        id: String,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankAnswer {
    pub id: String,
    #[serde(default)]
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleFillInDetail {
    #[serde(default)]
    pub blocks: Vec<FillBlock>,
    pub answers: Vec<BlankAnswer>,
}

// ========== vertical_calculation ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalMode {
    /// 所有项使用同一个运算符
    #[default]
    Single,
    /// 每两项之间单独选择运算符
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalLayout {
    pub rows: Vec<NumberText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operators: Vec<Operation>,
    #[serde(default)]
    pub mode: VerticalMode,
}

impl VerticalLayout {
    /// 第 `gap` 个空隙（第 gap 项和第 gap+1 项之间）的运算符
    pub fn operator_at(&self, gap: usize) -> Option<Operation> {
        match self.mode {
            VerticalMode::Single => self.operator,
            VerticalMode::Mixed => self.operators.get(gap).copied(),
        }
    }

    /// 从左到右依次计算，任一项不是数字、缺少运算符或除以 0 时返回 None
    pub fn evaluate(&self) -> Option<f64> {
        let (first, rest) = self.rows.split_first()?;
        let mut acc = first.value()?;
        for (gap, row) in rest.iter().enumerate() {
            let op = self.operator_at(gap)?;
            acc = op.apply(acc, row.value()?)?;
        }
        Some(acc)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalCalculationDetail {
    pub layout: VerticalLayout,
    #[serde(default)]
    pub result: NumberText,
}

// ========== expression ==========

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionMode {
    /// 学生填写结果
    #[default]
    BlankResult,
    /// 学生填写第一个数
    BlankOperand1,
    /// 学生填写第二个数
    BlankOperand2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionDetail {
    pub operation: Operation,
    pub operand1: NumberText,
    pub operand2: NumberText,
    #[serde(default)]
    pub result: NumberText,
    #[serde(default)]
    pub mode: ExpressionMode,
}

impl ExpressionDetail {
    pub fn compute(&self) -> Option<f64> {
        self.operation
            .apply(self.operand1.value()?, self.operand2.value()?)
    }
}

// ========== matching_pairs ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchItem {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchColumn {
    #[serde(default)]
    pub title: String,
    pub items: Vec<MatchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPairsDetail {
    pub columns: Vec<MatchColumn>,
    pub pairs: Vec<MatchPair>,
    #[serde(rename = "allowPartialCredit", default)]
    pub allow_partial_credit: bool,
}
