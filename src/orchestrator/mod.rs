//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量草稿处理器
//! - 管理应用生命周期（初始化、运行）
//! - 扫描草稿文件夹（Vec<PathBuf>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `draft_processor` - 单个草稿处理器
//! - 读取草稿和本地图片
//! - 构建信封，补全层级快照
//! - 调用 SaveFlow 保存
//! - 归档已提交的文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! draft_processor (处理单个 DraftFile)
//!     ↓
//! workflow::SaveFlow (校验 → 上传 → 保存)
//!     ↓
//! services / validation (能力层)
//!     ↓
//! clients (基础设施：ApiClient)
//! ```

pub mod batch_processor;
pub mod draft_processor;

pub use batch_processor::{App, ProcessingStats};
pub use draft_processor::{build_envelope, process_draft};
