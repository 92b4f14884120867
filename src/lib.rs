//! # Question Admin
//!
//! 教学内容管理后台的题目核心：构建、校验并提交题目信封
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 客户端和 token，只暴露 REST 调用能力
//! - `ApiClient` - 题目、课程层级、图片上传、管理员、审计日志
//!
//! ### ② 业务能力层（Models / Validation / Editors / Services）
//! - `models/` - 信封及七种题型的数据结构
//! - `factory` - 补齐默认值，构建信封
//! - `validation/` - 按题型分派的校验器
//! - `editors/` - 每种题型的编辑状态，每次修改后重新校验
//! - `preview` - 纯文本预览
//! - `services/` - 本地图片、图片上传、草稿存储、层级选择
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 保存一道题的完整流程
//! - `SaveFlow` - 校验 → 上传图片 → 替换 URL → 创建 / 更新
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量草稿处理器，管理并发
//! - `orchestrator/draft_processor` - 单个草稿处理器
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod editors;
pub mod error;
pub mod factory;
pub mod models;
pub mod orchestrator;
pub mod preview;
pub mod services;
pub mod utils;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod test_support;

// 重新导出常用类型
pub use clients::ApiClient;
pub use config::Config;
pub use error::{ApiError, ApiErrorKind, AppError, AppResult};
pub use factory::{make_envelope, EnvelopeExtras};
pub use models::{Envelope, QuestionBody, QuestionKind};
pub use orchestrator::App;
pub use preview::render_preview;
pub use validation::{validate, validate_value, ValidationReport};
pub use workflow::{SaveFlow, SaveState, SaveTarget};
