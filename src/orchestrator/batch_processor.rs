//! 批量草稿处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：启动日志文件、创建 API 客户端
//! 2. **批量加载**：扫描草稿文件夹中的所有 TOML 文件
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **全局统计**：汇总所有草稿的处理结果
//!
//! 单个草稿的细节委托给 `draft_processor`。

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::clients::ApiClient;
use crate::config::Config;
use crate::models::list_draft_files;
use crate::orchestrator::draft_processor;
use crate::services::hierarchy::HierarchySource;
use crate::services::image_upload::ImageUploader;
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_drafts_loaded, log_startup,
    print_final_stats,
};
use crate::workflow::QuestionStore;

/// 应用主结构
pub struct App<B = ApiClient> {
    config: Config,
    backend: Arc<B>,
}

impl App<ApiClient> {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config);

        if config.api_token.is_empty() {
            warn!("⚠️ 未设置 API_TOKEN，请求将不带身份信息");
        }
        let client = ApiClient::new(&config).context("无法创建 API 客户端")?;
        Ok(Self::with_backend(config, Arc::new(client)))
    }
}

impl<B> App<B>
where
    B: ImageUploader + QuestionStore + HierarchySource + Send + Sync + 'static,
{
    pub fn with_backend(config: Config, backend: Arc<B>) -> Self {
        Self { config, backend }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描待处理的草稿...");
        let drafts = list_draft_files(&self.config.draft_folder).await?;

        if drafts.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_drafts_loaded(drafts.len(), self.config.max_concurrent_drafts);

        let stats = self.process_all_drafts(drafts).await?;
        print_final_stats(&stats, &self.config.output_log_file);
        Ok(stats)
    }

    async fn process_all_drafts(&self, drafts: Vec<PathBuf>) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_drafts.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = drafts.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (batch_idx, batch) in drafts.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            log_batch_start(
                batch_idx + 1,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let result = self
                .process_batch(batch, batch_start, semaphore.clone())
                .await?;
            stats.success += result.success;
            stats.failed += result.failed;

            log_batch_complete(batch_idx + 1, result.success, result.success + result.failed);
        }

        Ok(stats)
    }

    async fn process_batch(
        &self,
        batch: &[PathBuf],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut handles = Vec::new();

        for (idx, path) in batch.iter().enumerate() {
            let draft_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let backend = Arc::clone(&self.backend);
            let config = self.config.clone();
            let path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                draft_processor::process_draft(backend.as_ref(), &path, draft_index, &config)
                    .await
                    .map_err(|e| {
                        error!("[草稿 {}] ❌ 处理过程中发生错误: {:#}", draft_index, e);
                        e
                    })
            });
            handles.push((draft_index, handle));
        }

        let mut result = BatchResult::default();
        for (draft_index, handle) in handles {
            match handle.await {
                Ok(Ok(_)) => result.success += 1,
                Ok(Err(_)) => result.failed += 1,
                Err(e) => {
                    error!("[草稿 {}] 任务执行失败: {}", draft_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}
