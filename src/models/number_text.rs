//! 表单中的数字字段
//!
//! 保留用户输入的原始文本，反序列化时同时接受字符串和数字

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid decimal regex"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NumberText(String);

impl NumberText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// 由计算结果生成文本，整数不带小数点，小数最多保留 6 位
    pub fn from_value(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            return Self(format!("{}", value as i64));
        }
        let text = format!("{:.6}", value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        Self(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// 是否是合法的十进制数
    pub fn is_numeric(&self) -> bool {
        decimal_pattern().is_match(self.0.trim())
    }

    pub fn value(&self) -> Option<f64> {
        if self.is_numeric() {
            self.0.trim().parse().ok()
        } else {
            None
        }
    }
}

impl From<&str> for NumberText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for NumberText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for NumberText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        use std::fmt;

        struct NumberTextVisitor;

        impl<'de> Visitor<'de> for NumberTextVisitor {
            type Value = NumberText;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or number")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(NumberText::new(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(NumberText(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(NumberText(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(NumberText::from_value(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(NumberText::default())
            }
        }

        deserializer.deserialize_any(NumberTextVisitor)
    }
}
