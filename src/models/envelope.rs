//! 题目信封（Envelope）
//!
//! 线上格式为 `{version, kind, prompt, media, detail, explanation, hints, scoring, meta}`，
//! 内存中 `kind` 与 `detail` 合并为 [`QuestionBody`]，保证题型和数据结构始终一致。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::detail::{
    ExpressionDetail, FibSingleDetail, ImageChoiceDetail, MatchingPairsDetail, McqSingleDetail,
    MultipleFillInDetail, VerticalCalculationDetail,
};
use super::hierarchy::HierarchySnapshot;
use super::kind::QuestionKind;

/// 当前信封版本
pub const ENVELOPE_VERSION: u32 = 1;

/// 本地预览引用的前缀，上传后替换为持久 URL
pub const LOCAL_REF_PREFIX: &str = "blob:";

pub fn is_local_ref(url: &str) -> bool {
    url.starts_with(LOCAL_REF_PREFIX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    #[default]
    Image,
    Audio,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

impl Media {
    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            media_type: MediaType::Image,
            url: url.into(),
            alt: alt.into(),
        }
    }
}

/// 计分规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    pub full_points: f64,
    #[serde(default)]
    pub partial_points: f64,
    #[serde(default)]
    pub penalty: f64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            full_points: 1.0,
            partial_points: 0.0,
            penalty: 0.0,
        }
    }
}

/// 自由格式的元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<HierarchySnapshot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 题型 + detail
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionBody {
    McqSingle(McqSingleDetail),
    FibSingle(FibSingleDetail),
    ImageChoice(ImageChoiceDetail),
    MultipleFillIn(MultipleFillInDetail),
    VerticalCalculation(VerticalCalculationDetail),
    Expression(ExpressionDetail),
    MatchingPairs(MatchingPairsDetail),
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionBody::McqSingle(_) => QuestionKind::McqSingle,
            QuestionBody::FibSingle(_) => QuestionKind::FibSingle,
            QuestionBody::ImageChoice(_) => QuestionKind::ImageChoice,
            QuestionBody::MultipleFillIn(_) => QuestionKind::MultipleFillIn,
            QuestionBody::VerticalCalculation(_) => QuestionKind::VerticalCalculation,
            QuestionBody::Expression(_) => QuestionKind::Expression,
            QuestionBody::MatchingPairs(_) => QuestionKind::MatchingPairs,
        }
    }

    /// 按题型解析 detail
    pub fn from_parts(kind: QuestionKind, detail: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            QuestionKind::McqSingle => QuestionBody::McqSingle(serde_json::from_value(detail)?),
            QuestionKind::FibSingle => QuestionBody::FibSingle(serde_json::from_value(detail)?),
            QuestionKind::ImageChoice => {
                QuestionBody::ImageChoice(serde_json::from_value(detail)?)
            }
            QuestionKind::MultipleFillIn => {
                QuestionBody::MultipleFillIn(serde_json::from_value(detail)?)
            }
            QuestionKind::VerticalCalculation => {
                QuestionBody::VerticalCalculation(serde_json::from_value(detail)?)
            }
            QuestionKind::Expression => QuestionBody::Expression(serde_json::from_value(detail)?),
            QuestionKind::MatchingPairs => {
                QuestionBody::MatchingPairs(serde_json::from_value(detail)?)
            }
        })
    }

    pub fn detail_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            QuestionBody::McqSingle(d) => serde_json::to_value(d),
            QuestionBody::FibSingle(d) => serde_json::to_value(d),
            QuestionBody::ImageChoice(d) => serde_json::to_value(d),
            QuestionBody::MultipleFillIn(d) => serde_json::to_value(d),
            QuestionBody::VerticalCalculation(d) => serde_json::to_value(d),
            QuestionBody::Expression(d) => serde_json::to_value(d),
            QuestionBody::MatchingPairs(d) => serde_json::to_value(d),
        }
    }
}

/// 题目信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope", into = "RawEnvelope")]
pub struct Envelope {
    pub version: u32,
    pub body: QuestionBody,
    pub prompt: String,
    pub media: Vec<Media>,
    pub explanation: Option<String>,
    pub hints: Vec<String>,
    pub scoring: Scoring,
    pub meta: Meta,
}

impl Envelope {
    pub fn kind(&self) -> QuestionKind {
        self.body.kind()
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// 线上格式，`detail` 暂存为未解析的 JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnvelope {
    pub version: u32,
    pub kind: QuestionKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<Media>,
    pub detail: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hints: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scoring: Scoring,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Meta,
}

/// 显式的 `null` 与缺省字段同样处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TryFrom<RawEnvelope> for Envelope {
    type Error = serde_json::Error;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        Ok(Self {
            version: raw.version,
            body: QuestionBody::from_parts(raw.kind, raw.detail)?,
            prompt: raw.prompt,
            media: raw.media,
            explanation: raw.explanation,
            hints: raw.hints,
            scoring: raw.scoring,
            meta: raw.meta,
        })
    }
}

impl From<Envelope> for RawEnvelope {
    fn from(envelope: Envelope) -> Self {
        // detail 全部是字符串键的结构体，序列化不会失败
        let detail = envelope.body.detail_value().unwrap_or(Value::Null);
        Self {
            version: envelope.version,
            kind: envelope.body.kind(),
            prompt: envelope.prompt,
            media: envelope.media,
            detail,
            explanation: envelope.explanation,
            hints: envelope.hints,
            scoring: envelope.scoring,
            meta: envelope.meta,
        }
    }
}
