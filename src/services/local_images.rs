//! 本地图片暂存
//!
//! 编辑器接收的图片文件在上传前以 `blob:` 引用保存在这里

use phf::{phf_map, phf_set};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::envelope::LOCAL_REF_PREFIX;

/// 扩展名 → MIME
static EXTENSION_MIME: phf::Map<&'static str, &'static str> = phf_map! {
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "svg" => "image/svg+xml",
};

/// 允许上传的图片类型
static ALLOWED_MIME: phf::Set<&'static str> = phf_set! {
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
};

/// 用户选择的图片文件
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    /// 为空时按扩展名推断
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// 从磁盘读取，MIME 按扩展名推断
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(file_name, "", bytes))
    }

    /// 实际使用的 MIME 类型
    pub fn mime(&self) -> Option<&str> {
        if !self.content_type.trim().is_empty() {
            return Some(self.content_type.trim());
        }
        let ext = Path::new(&self.file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        EXTENSION_MIME.get(ext.as_str()).copied()
    }
}

/// 校验图片类型和大小
pub fn validate_image_file(file: &ImageFile, max_bytes: usize) -> AppResult<()> {
    let invalid = |reason: String| AppError::InvalidImage {
        file_name: file.file_name.clone(),
        reason,
    };

    match file.mime() {
        Some(mime) if ALLOWED_MIME.contains(mime) => {}
        Some(mime) => return Err(invalid(format!("Định dạng không hỗ trợ: {}", mime))),
        None => return Err(invalid("Không xác định được định dạng ảnh".to_string())),
    }

    if file.bytes.is_empty() {
        return Err(invalid("Tệp ảnh rỗng".to_string()));
    }
    if file.bytes.len() > max_bytes {
        return Err(invalid(format!(
            "Kích thước ảnh vượt quá {} KB",
            max_bytes / 1024
        )));
    }
    Ok(())
}

/// 本地图片暂存区
#[derive(Debug, Default)]
pub struct LocalImageStore {
    images: HashMap<String, ImageFile>,
    max_bytes: usize,
}

impl LocalImageStore {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            images: HashMap::new(),
            max_bytes,
        }
    }

    /// 校验并暂存图片，返回新的 `blob:` 引用
    pub fn accept(&mut self, file: ImageFile) -> AppResult<String> {
        let local_ref = format!("{}{}", LOCAL_REF_PREFIX, uuid::Uuid::new_v4());
        self.insert(local_ref.clone(), file)?;
        Ok(local_ref)
    }

    /// 使用指定引用暂存图片
    pub fn insert(&mut self, local_ref: impl Into<String>, file: ImageFile) -> AppResult<()> {
        let local_ref = local_ref.into();
        if !local_ref.starts_with(LOCAL_REF_PREFIX) {
            return Err(AppError::InvalidImage {
                file_name: file.file_name,
                reason: format!("Tham chiếu cục bộ phải bắt đầu bằng {}", LOCAL_REF_PREFIX),
            });
        }
        validate_image_file(&file, self.max_bytes)?;
        debug!("暂存本地图片: {} -> {}", local_ref, file.file_name);
        self.images.insert(local_ref, file);
        Ok(())
    }

    pub fn get(&self, local_ref: &str) -> Option<&ImageFile> {
        self.images.get(local_ref)
    }

    pub fn remove(&mut self, local_ref: &str) -> Option<ImageFile> {
        self.images.remove(local_ref)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str, size: usize) -> ImageFile {
        ImageFile::new(name, "", vec![0u8; size])
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(png("a.PNG", 1).mime(), Some("image/png"));
        assert_eq!(png("a.jpeg", 1).mime(), Some("image/jpeg"));
        assert_eq!(png("a.bmp", 1).mime(), None);
        assert_eq!(
            ImageFile::new("x", "image/webp", vec![1]).mime(),
            Some("image/webp")
        );
    }

    #[test]
    fn test_validate_type_and_size() {
        assert!(validate_image_file(&png("a.png", 10), 10).is_ok());
        assert!(validate_image_file(&png("a.png", 11), 10).is_err());
        assert!(validate_image_file(&png("a.png", 0), 10).is_err());
        assert!(validate_image_file(&ImageFile::new("a.pdf", "application/pdf", vec![1]), 10).is_err());
    }

    #[test]
    fn test_accept_generates_blob_ref() {
        let mut store = LocalImageStore::new(1024);
        let local_ref = store.accept(png("cat.png", 4)).unwrap();
        assert!(local_ref.starts_with("blob:"));
        assert_eq!(store.get(&local_ref).map(|f| f.file_name.as_str()), Some("cat.png"));
        assert!(store.insert("https://cdn/x.png", png("x.png", 4)).is_err());
        assert_eq!(store.len(), 1);
    }
}
