use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 客户端校验失败，不会发送到网络
    #[error("校验失败: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// 网络错误（没有收到响应）
    #[error("无法连接到服务器 ({endpoint}): {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 后端拒绝请求（4xx / 5xx）
    #[error("{}", .0)]
    Api(ApiError),

    /// 图片上传失败，整批中止
    #[error("有 {} 张图片上传失败: {}", .failed.len(), .failed.join(", "))]
    Upload { failed: Vec<String> },

    /// 已有保存任务在进行中
    #[error("正在保存，请稍候")]
    Busy,

    /// 图片文件不符合要求
    #[error("图片不符合要求 ({file_name}): {reason}")]
    InvalidImage { file_name: String, reason: String },

    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML 解析失败
    #[error("TOML解析失败: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 后端返回的错误响应
///
/// `message` 优先取响应体中的 `message` / `error` 字段，否则按状态码给出默认提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub endpoint: String,
    pub status: u16,
    pub kind: ApiErrorKind,
    pub message: String,
}

/// 按状态码归类的后端错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401，需要重新登录
    SessionExpired,
    /// 403
    PermissionDenied,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 其他 4xx / 5xx
    Other,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiErrorKind::SessionExpired,
            403 => ApiErrorKind::PermissionDenied,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            _ => ApiErrorKind::Other,
        }
    }

    /// 响应体里没有消息时使用的默认提示
    pub fn fallback_message(self) -> &'static str {
        match self {
            ApiErrorKind::SessionExpired => "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại",
            ApiErrorKind::PermissionDenied => "Bạn không có quyền thực hiện thao tác này",
            ApiErrorKind::NotFound => "Không tìm thấy dữ liệu",
            ApiErrorKind::Conflict => "Dữ liệu bị xung đột, vui lòng tải lại và thử lại",
            ApiErrorKind::Other => "Đã xảy ra lỗi, vui lòng thử lại sau",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "API返回错误响应 ({}): status={}, message={}",
            self.endpoint, self.status, self.message
        )
    }
}

impl std::error::Error for ApiError {}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络错误
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Network {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建文件读取错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }

    /// 是否需要重新登录
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            AppError::Api(ApiError {
                kind: ApiErrorKind::SessionExpired,
                ..
            })
        )
    }

    /// 面向用户显示的文本
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.join("\n"),
            AppError::Network { .. } => {
                "Không thể kết nối tới máy chủ, vui lòng kiểm tra kết nối mạng".to_string()
            }
            AppError::Api(e) => e.message.clone(),
            AppError::Upload { failed } => {
                format!("Tải lên thất bại {} ảnh", failed.len())
            }
            other => other.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
