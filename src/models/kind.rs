use serde::{Deserialize, Serialize};

/// 题型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// 单选题
    McqSingle,
    /// 单空填空题
    FibSingle,
    /// 图片选择题
    ImageChoice,
    /// 多空填空题
    MultipleFillIn,
    /// 竖式计算
    VerticalCalculation,
    /// 算式
    Expression,
    /// 连线题
    MatchingPairs,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 7] = [
        QuestionKind::McqSingle,
        QuestionKind::FibSingle,
        QuestionKind::ImageChoice,
        QuestionKind::MultipleFillIn,
        QuestionKind::VerticalCalculation,
        QuestionKind::Expression,
        QuestionKind::MatchingPairs,
    ];

    /// 线上使用的标签
    pub fn tag(self) -> &'static str {
        match self {
            QuestionKind::McqSingle => "mcq_single",
            QuestionKind::FibSingle => "fib_single",
            QuestionKind::ImageChoice => "image_choice",
            QuestionKind::MultipleFillIn => "multiple_fill_in",
            QuestionKind::VerticalCalculation => "vertical_calculation",
            QuestionKind::Expression => "expression",
            QuestionKind::MatchingPairs => "matching_pairs",
        }
    }

    /// 界面显示名称
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::McqSingle => "Trắc nghiệm một đáp án",
            QuestionKind::FibSingle => "Điền vào chỗ trống",
            QuestionKind::ImageChoice => "Chọn hình ảnh",
            QuestionKind::MultipleFillIn => "Điền nhiều chỗ trống",
            QuestionKind::VerticalCalculation => "Tính theo cột dọc",
            QuestionKind::Expression => "Biểu thức",
            QuestionKind::MatchingPairs => "Nối cặp",
        }
    }

    /// 从标签解析题型
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// 题干是否写在 detail 中（此时 prompt 可为空）
    pub fn prompt_in_detail(self) -> bool {
        matches!(
            self,
            QuestionKind::VerticalCalculation | QuestionKind::Expression
        )
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// 四则运算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Addition => "+",
            Operation::Subtraction => "-",
            Operation::Multiplication => "×",
            Operation::Division => "÷",
        }
    }

    /// 计算结果，除数为 0 时返回 None
    pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        match self {
            Operation::Addition => Some(lhs + rhs),
            Operation::Subtraction => Some(lhs - rhs),
            Operation::Multiplication => Some(lhs * rhs),
            Operation::Division if rhs == 0.0 => None,
            Operation::Division => Some(lhs / rhs),
        }
    }
}
