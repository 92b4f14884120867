//! 单个草稿处理器 - 编排层
//!
//! 1. 读取 TOML 草稿和它引用的本地图片
//! 2. 补全层级快照
//! 3. 构建信封，交给 `SaveFlow` 校验、上传、保存
//! 4. 成功后归档草稿文件，避免重复提交

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::factory::{make_envelope, EnvelopeExtras};
use crate::models::{load_draft, load_draft_images, DraftFile, Envelope, QuestionBody};
use crate::preview::render_preview;
use crate::services::hierarchy::{HierarchyService, HierarchySource};
use crate::services::image_upload::ImageUploader;
use crate::services::local_images::LocalImageStore;
use crate::utils::logging::{append_log_line, truncate_text};
use crate::workflow::{QuestionStore, SaveCtx, SaveFlow, SaveOutcome, SaveTarget};

/// 草稿归档后缀
pub const ARCHIVE_SUFFIX: &str = "done";

/// 由草稿构建信封
pub fn build_envelope(draft: &DraftFile) -> Result<Envelope> {
    let body = QuestionBody::from_parts(draft.kind, draft.detail.clone())
        .with_context(|| format!("detail 与题型 {} 不匹配", draft.kind.tag()))?;

    Ok(make_envelope(
        body,
        draft.prompt.clone(),
        EnvelopeExtras {
            media: Some(draft.media.clone()),
            explanation: draft.explanation.clone(),
            hints: Some(draft.hints.clone()),
            scoring: draft.scoring.clone(),
            meta: draft.meta.clone(),
            ..Default::default()
        },
    ))
}

/// 处理单个草稿
///
/// # 返回
/// 返回保存结果；失败时草稿文件保持原样
pub async fn process_draft<B>(
    backend: &B,
    path: &Path,
    draft_index: usize,
    config: &Config,
) -> Result<SaveOutcome>
where
    B: ImageUploader + QuestionStore + HierarchySource + ?Sized,
{
    let draft = load_draft(path).await?;
    let ctx = SaveCtx::new(draft_index, file_name(path));
    log_draft_start(&ctx, &draft);

    let mut images = LocalImageStore::new(config.max_image_bytes);
    load_draft_images(&draft, &mut images).await?;
    if !images.is_empty() {
        info!("{} 🖼️ 已读取 {} 张本地图片", ctx, images.len());
    }

    let mut envelope = build_envelope(&draft)?;
    if envelope.meta.hierarchy.is_none() {
        match HierarchyService::new(backend)
            .resolve_subtopic(draft.subtopic_id)
            .await?
        {
            Some(snapshot) => envelope.meta.hierarchy = Some(snapshot),
            None => warn!(
                "{} ⚠️ 找不到子主题 {}，meta 中不写入层级",
                ctx, draft.subtopic_id
            ),
        }
    }

    if config.verbose_logging {
        info!("{} 预览:\n{}", ctx, render_preview(&envelope));
    }

    let target = match draft.question_id {
        Some(question_id) => SaveTarget::Update { question_id },
        None => SaveTarget::Create {
            subtopic_id: draft.subtopic_id,
        },
    };

    let outcome = SaveFlow::new(backend, backend)
        .save(&envelope, target, &images, &ctx)
        .await?;

    if let Err(e) = append_log_line(
        &config.output_log_file,
        &format!(
            "{} {} -> question #{}",
            ctx,
            draft.kind.tag(),
            outcome.record.id
        ),
    ) {
        warn!("{} ⚠️ 写入日志文件失败: {}", ctx, e);
    }

    archive_draft(path, &ctx)?;
    Ok(outcome)
}

/// 将已提交的草稿重命名为 `*.toml.done`
fn archive_draft(path: &Path, ctx: &SaveCtx) -> Result<()> {
    let mut archived = path.as_os_str().to_owned();
    archived.push(".");
    archived.push(ARCHIVE_SUFFIX);
    std::fs::rename(path, &archived)
        .with_context(|| format!("无法归档草稿: {}", path.display()))?;
    info!("{} 🗂️ 草稿已归档", ctx);
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

// ========== 日志辅助函数 ==========

fn log_draft_start(ctx: &SaveCtx, draft: &DraftFile) {
    info!("\n{} {}", ctx, "─".repeat(30));
    info!("{} 题型: {}", ctx, draft.kind.label());
    if !draft.prompt.trim().is_empty() {
        info!("{} 题干: {}", ctx, truncate_text(&draft.prompt, 60));
    }
    match draft.question_id {
        Some(id) => info!("{} 更新已有题目 #{}", ctx, id),
        None => info!("{} 新建题目，子主题 #{}", ctx, draft.subtopic_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;
    use crate::validation::validate;

    #[test]
    fn test_build_envelope_from_toml() {
        let draft: DraftFile = toml::from_str(
            r#"
kind = "expression"
subtopic_id = 12
hints = ["Nhớ bảng cửu chương"]

[detail]
operation = "multiplication"
operand1 = 6
operand2 = "7"
result = 42
mode = "blank_result"
"#,
        )
        .unwrap();

        let envelope = build_envelope(&draft).unwrap();
        assert_eq!(envelope.kind(), QuestionKind::Expression);
        assert_eq!(envelope.hints.len(), 1);
        assert!(validate(&envelope).valid);
    }

    #[test]
    fn test_build_envelope_rejects_mismatched_detail() {
        let draft: DraftFile = toml::from_str(
            r#"
kind = "mcq_single"
prompt = "?"
subtopic_id = 1

[detail]
answer = "x"
"#,
        )
        .unwrap();
        assert!(build_envelope(&draft).is_err());
    }
}
