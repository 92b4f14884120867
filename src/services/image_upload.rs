//! 图片上传 - 业务能力层
//!
//! 找出信封中所有本地预览引用（`blob:`），每个引用只上传一次，
//! 全部成功后返回替换为持久 URL 的新信封。任一失败则整批中止。

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{is_local_ref, Envelope, FillBlock, ImageRef, QuestionBody};
use crate::services::local_images::{ImageFile, LocalImageStore};

/// 上传能力
#[async_trait]
pub trait ImageUploader: Sync {
    /// 上传一个文件，返回持久 URL
    async fn upload(&self, file: &ImageFile) -> AppResult<String>;
}

/// 按出现顺序列出信封中不重复的本地引用
///
/// 扫描 `media[].url`、`detail.options[].image.url`、`detail.blocks[].src`
/// 以及连线题项目图片
pub fn collect_local_refs(envelope: &Envelope) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    let mut push = |url: &str| {
        if is_local_ref(url) && !refs.iter().any(|r| r == url) {
            refs.push(url.to_string());
        }
    };

    for media in &envelope.media {
        push(&media.url);
    }
    match &envelope.body {
        QuestionBody::ImageChoice(d) => {
            for option in &d.options {
                push(&option.image.url);
            }
        }
        QuestionBody::MultipleFillIn(d) => {
            for block in &d.blocks {
                if let FillBlock::Image { src, .. } = block {
                    push(src);
                }
            }
        }
        QuestionBody::MatchingPairs(d) => {
            for item in d.columns.iter().flat_map(|c| &c.items) {
                if let Some(image) = &item.image {
                    push(&image.url);
                }
            }
        }
        QuestionBody::McqSingle(_)
        | QuestionBody::FibSingle(_)
        | QuestionBody::VerticalCalculation(_)
        | QuestionBody::Expression(_) => {}
    }
    refs
}

/// 返回替换了本地引用的新信封
pub fn replace_local_refs(envelope: &Envelope, urls: &HashMap<String, String>) -> Envelope {
    let swap = |url: &mut String| {
        if let Some(persisted) = urls.get(url.as_str()) {
            *url = persisted.clone();
        }
    };
    let swap_image = |image: &mut ImageRef| swap(&mut image.url);

    let mut next = envelope.clone();
    for media in &mut next.media {
        swap(&mut media.url);
    }
    match &mut next.body {
        QuestionBody::ImageChoice(d) => {
            for option in &mut d.options {
                swap_image(&mut option.image);
            }
        }
        QuestionBody::MultipleFillIn(d) => {
            for block in &mut d.blocks {
                if let FillBlock::Image { src, .. } = block {
                    swap(src);
                }
            }
        }
        QuestionBody::MatchingPairs(d) => {
            for item in d.columns.iter_mut().flat_map(|c| &mut c.items) {
                if let Some(image) = &mut item.image {
                    swap_image(image);
                }
            }
        }
        QuestionBody::McqSingle(_)
        | QuestionBody::FibSingle(_)
        | QuestionBody::VerticalCalculation(_)
        | QuestionBody::Expression(_) => {}
    }
    next
}

/// 上传信封中的本地图片
///
/// 上传并发进行；失败时返回 `AppError::Upload`，原信封不变。
/// 已上传成功的文件不会在后端回滚。
pub async fn process_envelope_images<U: ImageUploader + ?Sized>(
    envelope: &Envelope,
    store: &LocalImageStore,
    uploader: &U,
) -> AppResult<Envelope> {
    let refs = collect_local_refs(envelope);
    if refs.is_empty() {
        debug!("没有需要上传的本地图片");
        return Ok(envelope.clone());
    }

    info!("📤 正在上传 {} 张本地图片...", refs.len());

    let uploads = refs.iter().map(|local_ref| async move {
        let result = match store.get(local_ref) {
            Some(file) => uploader
                .upload(file)
                .await
                .map_err(|e| (file.file_name.clone(), e)),
            None => Err((
                local_ref.clone(),
                AppError::InvalidImage {
                    file_name: local_ref.clone(),
                    reason: "Không tìm thấy tệp ảnh cục bộ".to_string(),
                },
            )),
        };
        (local_ref, result)
    });

    let mut persisted = HashMap::new();
    let mut failed = Vec::new();
    for (local_ref, result) in join_all(uploads).await {
        match result {
            Ok(url) => {
                debug!("✓ {} -> {}", local_ref, url);
                persisted.insert(local_ref.clone(), url);
            }
            Err((file_name, e)) => {
                warn!("⚠️ 图片上传失败 {}: {}", file_name, e);
                failed.push(file_name);
            }
        }
    }

    if !failed.is_empty() {
        if !persisted.is_empty() {
            warn!(
                "⚠️ 已上传的 {} 张图片不会回滚，后端可能留下孤立文件",
                persisted.len()
            );
        }
        return Err(AppError::Upload { failed });
    }

    info!("✓ {} 张图片上传完成", persisted.len());
    Ok(replace_local_refs(envelope, &persisted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Media, QuestionKind};
    use crate::test_support::envelope;
    use std::sync::Mutex;

    /// 记录上传调用，文件名包含 "bad" 时失败
    #[derive(Default)]
    struct FakeUploader {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageUploader for FakeUploader {
        async fn upload(&self, file: &ImageFile) -> AppResult<String> {
            self.calls.lock().unwrap().push(file.file_name.clone());
            if file.file_name.contains("bad") {
                return Err(AppError::Upload {
                    failed: vec![file.file_name.clone()],
                });
            }
            Ok(format!("https://cdn.example.com/{}", file.file_name))
        }
    }

    fn store_with(files: &[(&str, &str)]) -> LocalImageStore {
        let mut store = LocalImageStore::new(1024);
        for (local_ref, name) in files {
            store
                .insert(*local_ref, ImageFile::new(*name, "image/png", vec![1]))
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_only_local_refs_are_uploaded() {
        let mut env = envelope(QuestionKind::ImageChoice);
        if let QuestionBody::ImageChoice(d) = &mut env.body {
            d.options[0].image.url = "blob:cat".into();
        }
        let store = store_with(&[("blob:cat", "cat.png")]);
        let uploader = FakeUploader::default();

        let result = process_envelope_images(&env, &store, &uploader).await.unwrap();

        assert_eq!(*uploader.calls.lock().unwrap(), vec!["cat.png".to_string()]);
        if let QuestionBody::ImageChoice(d) = &result.body {
            assert_eq!(d.options[0].image.url, "https://cdn.example.com/cat.png");
            assert_eq!(d.options[1].image.url, "https://cdn.example.com/dog.png");
        }
    }

    #[tokio::test]
    async fn test_shared_ref_uploaded_once_and_replaced_everywhere() {
        let mut env = envelope(QuestionKind::MultipleFillIn);
        env.media.push(Media::image("blob:pic", "hình"));
        if let QuestionBody::MultipleFillIn(d) = &mut env.body {
            d.blocks.push(FillBlock::Image {
                src: "blob:pic".into(),
                alt: String::new(),
            });
        }
        assert_eq!(collect_local_refs(&env), vec!["blob:pic".to_string()]);

        let store = store_with(&[("blob:pic", "pic.png")]);
        let uploader = FakeUploader::default();
        let result = process_envelope_images(&env, &store, &uploader).await.unwrap();

        assert_eq!(uploader.calls.lock().unwrap().len(), 1);
        assert!(collect_local_refs(&result).is_empty());
        assert_eq!(result.media[0].url, "https://cdn.example.com/pic.png");
    }

    #[tokio::test]
    async fn test_failure_aborts_whole_batch() {
        let mut env = envelope(QuestionKind::ImageChoice);
        if let QuestionBody::ImageChoice(d) = &mut env.body {
            d.options[0].image.url = "blob:good".into();
            d.options[1].image.url = "blob:bad".into();
        }
        env.media.push(Media::image("blob:missing", ""));
        let store = store_with(&[("blob:good", "good.png"), ("blob:bad", "bad.png")]);
        let uploader = FakeUploader::default();

        let err = process_envelope_images(&env, &store, &uploader)
            .await
            .unwrap_err();

        match err {
            AppError::Upload { mut failed } => {
                failed.sort();
                assert_eq!(failed, vec!["bad.png".to_string(), "blob:missing".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
        // 原信封不变
        assert_eq!(collect_local_refs(&env).len(), 3);
    }

    #[tokio::test]
    async fn test_no_local_refs_is_noop() {
        let env = envelope(QuestionKind::McqSingle);
        let uploader = FakeUploader::default();
        let result = process_envelope_images(&env, &LocalImageStore::default(), &uploader)
            .await
            .unwrap();
        assert_eq!(result, env);
        assert!(uploader.calls.lock().unwrap().is_empty());
    }
}
