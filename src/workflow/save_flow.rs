//! 保存流程 - 流程层
//!
//! 状态顺序：
//! 1. idle → 校验（失败直接返回，不访问网络）
//! 2. uploading → 上传本地图片（没有本地图片时跳过）
//! 3. replacing_urls → 替换为持久 URL
//! 4. persisting → 创建或更新题目
//! 5. done
//!
//! 任一步骤失败都回到 idle，调用方持有的信封保持不变。

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Envelope, QuestionBody, QuestionRecord};
use crate::services::image_upload::{collect_local_refs, process_envelope_images, ImageUploader};
use crate::services::local_images::LocalImageStore;
use crate::validation::{unresolved_pairs, validate};
use crate::workflow::save_ctx::SaveCtx;

/// 题目持久化能力
#[async_trait]
pub trait QuestionStore: Sync {
    /// POST：在子主题下新建题目
    async fn create(&self, subtopic_id: i64, envelope: &Envelope) -> AppResult<QuestionRecord>;
    /// PUT：更新已有题目
    async fn update(&self, question_id: i64, envelope: &Envelope) -> AppResult<QuestionRecord>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Uploading,
    ReplacingUrls,
    Persisting,
    Done,
}

/// 保存目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create { subtopic_id: i64 },
    Update { question_id: i64 },
}

impl SaveTarget {
    /// 有题目 id 时更新，否则按 meta 中的子主题新建
    pub fn for_envelope(envelope: &Envelope, question_id: Option<i64>) -> Option<Self> {
        if let Some(question_id) = question_id {
            return Some(SaveTarget::Update { question_id });
        }
        envelope
            .meta
            .hierarchy
            .as_ref()
            .map(|h| SaveTarget::Create {
                subtopic_id: h.subtopic_id,
            })
    }
}

/// 保存结果
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub record: QuestionRecord,
    /// 实际提交的信封（已替换图片 URL）
    pub envelope: Envelope,
    pub uploaded_images: usize,
}

/// 保存流程
///
/// - 同一时刻只允许一个保存任务
/// - 不持有任何草稿数据，只依赖上传和持久化能力
pub struct SaveFlow<'a, U: ?Sized, S: ?Sized> {
    uploader: &'a U,
    store: &'a S,
    busy: AtomicBool,
    state: Mutex<SaveState>,
}

/// 离开作用域时释放忙碌标记
struct BusyGuard<'f>(&'f AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<'a, U, S> SaveFlow<'a, U, S>
where
    U: ImageUploader + ?Sized,
    S: QuestionStore + ?Sized,
{
    pub fn new(uploader: &'a U, store: &'a S) -> Self {
        Self {
            uploader,
            store,
            busy: AtomicBool::new(false),
            state: Mutex::new(SaveState::Idle),
        }
    }

    pub fn state(&self) -> SaveState {
        self.state.lock().map(|s| *s).unwrap_or(SaveState::Idle)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn set_state(&self, ctx: &SaveCtx, next: SaveState) {
        debug!("{} 状态 → {:?}", ctx, next);
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    pub async fn save(
        &self,
        envelope: &Envelope,
        target: SaveTarget,
        images: &LocalImageStore,
        ctx: &SaveCtx,
    ) -> AppResult<SaveOutcome> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("{} ⚠️ 已有保存任务在进行中", ctx);
            return Err(AppError::Busy);
        }
        let _guard = BusyGuard(&self.busy);
        self.set_state(ctx, SaveState::Idle);

        let result = self.run(envelope, target, images, ctx).await;
        match &result {
            Ok(outcome) => {
                self.set_state(ctx, SaveState::Done);
                info!("{} ✅ 保存成功，题目 ID: {}", ctx, outcome.record.id);
            }
            Err(e) => {
                self.set_state(ctx, SaveState::Idle);
                error!("{} ❌ 保存失败: {}", ctx, e);
            }
        }
        result
    }

    async fn run(
        &self,
        envelope: &Envelope,
        target: SaveTarget,
        images: &LocalImageStore,
        ctx: &SaveCtx,
    ) -> AppResult<SaveOutcome> {
        let report = validate(envelope);
        if !report.valid {
            warn!("{} 校验失败: {}", ctx, report.errors.join("; "));
            return Err(AppError::Validation(report.errors));
        }
        if let QuestionBody::MatchingPairs(detail) = &envelope.body {
            let dangling = unresolved_pairs(detail);
            if !dangling.is_empty() {
                warn!("{} ⚠️ 有 {} 个连线引用了不存在的项目", ctx, dangling.len());
            }
        }

        let uploaded_images = collect_local_refs(envelope).len();
        let prepared = if uploaded_images > 0 {
            self.set_state(ctx, SaveState::Uploading);
            let replaced = process_envelope_images(envelope, images, self.uploader).await?;
            self.set_state(ctx, SaveState::ReplacingUrls);
            replaced
        } else {
            envelope.clone()
        };

        self.set_state(ctx, SaveState::Persisting);
        let record = match target {
            SaveTarget::Create { subtopic_id } => {
                info!("{} 📤 新建题目（子主题 {}）", ctx, subtopic_id);
                self.store.create(subtopic_id, &prepared).await?
            }
            SaveTarget::Update { question_id } => {
                info!("{} 📤 更新题目 {}", ctx, question_id);
                self.store.update(question_id, &prepared).await?
            }
        };

        Ok(SaveOutcome {
            record,
            envelope: prepared,
            uploaded_images,
        })
    }
}
