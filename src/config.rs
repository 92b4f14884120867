/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 后端 API 配置 ---
    pub api_base_url: String,
    /// Bearer token，由外部登录流程提供
    pub api_token: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 草稿 TOML 文件存放目录
    pub draft_folder: String,
    /// 同时处理的草稿数量
    pub max_concurrent_drafts: usize,
    /// 单张图片最大字节数
    pub max_image_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: String::new(),
            request_timeout_secs: 30,
            draft_folder: "drafts".to_string(),
            max_concurrent_drafts: 8,
            max_image_bytes: 5 * 1024 * 1024,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: std::env::var("API_TOKEN").unwrap_or(default.api_token),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            draft_folder: std::env::var("DRAFT_FOLDER").unwrap_or(default.draft_folder),
            max_concurrent_drafts: std::env::var("MAX_CONCURRENT_DRAFTS").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(default.max_concurrent_drafts),
            max_image_bytes: std::env::var("MAX_IMAGE_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_image_bytes),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
