use crate::models::draft::DraftFile;
use crate::services::local_images::{ImageFile, LocalImageStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载草稿
pub async fn load_draft(toml_file_path: &Path) -> Result<DraftFile> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let draft: DraftFile = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(draft.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 读取草稿引用的本地图片并暂存
///
/// 图片路径相对于草稿文件所在目录
pub async fn load_draft_images(draft: &DraftFile, store: &mut LocalImageStore) -> Result<()> {
    let base_dir = draft
        .file_path
        .as_deref()
        .and_then(|p| Path::new(p).parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();

    for (local_ref, relative_path) in &draft.images {
        let path = base_dir.join(relative_path);
        let file = ImageFile::from_path(&path)
            .await
            .with_context(|| format!("无法读取图片: {}", path.display()))?;
        store
            .insert(local_ref.clone(), file)
            .with_context(|| format!("图片不符合要求: {}", path.display()))?;
    }

    Ok(())
}

/// 列出文件夹中所有 TOML 草稿（按文件名排序）
pub async fn list_draft_files(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            files.push(path);
        }
    }

    files.sort();
    tracing::info!("在 {} 中找到 {} 个草稿文件", folder_path, files.len());

    Ok(files)
}
