//! 后端 REST API 客户端
//!
//! 所有请求携带配置中的 Bearer token。不做重试，也不刷新 token。

use async_trait::async_trait;
use reqwest::{multipart, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ApiErrorKind, AppError, AppResult};
use crate::models::admin::{
    Admin, AdminPayload, AuditLogEntry, AuditLogFilter, Page, PasswordResetRequest, ResetStatus,
};
use crate::models::{
    Envelope, Grade, QuestionFilter, QuestionRecord, SubTopic, Subject, Topic,
};
use crate::services::hierarchy::HierarchySource;
use crate::services::image_upload::ImageUploader;
use crate::services::local_images::ImageFile;
use crate::workflow::QuestionStore;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    /// 发送请求并返回响应体文本，非 2xx 映射为 `AppError::Api`
    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> AppResult<String> {
        debug!("→ {}", endpoint);
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::network(endpoint, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(endpoint, e))?;

        if !status.is_success() {
            let error = api_error(endpoint, status.as_u16(), &body);
            warn!("✗ {}", error);
            return Err(AppError::Api(error));
        }
        debug!("← {} {}", endpoint, status);
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> AppResult<T> {
        let body = self.send(endpoint, builder).await?;
        decode_body(&body)
    }

    // ========== 题目 ==========

    pub async fn create_question(
        &self,
        subtopic_id: i64,
        envelope: &Envelope,
    ) -> AppResult<QuestionRecord> {
        let path = format!("/subtopics/{}/questions", subtopic_id);
        let builder = self.request(Method::POST, &path).json(&question_body(envelope)?);
        self.send_json(&path, builder).await
    }

    pub async fn update_question(
        &self,
        question_id: i64,
        envelope: &Envelope,
    ) -> AppResult<QuestionRecord> {
        let path = format!("/questions/{}", question_id);
        let builder = self.request(Method::PUT, &path).json(&question_body(envelope)?);
        self.send_json(&path, builder).await
    }

    pub async fn get_question(&self, question_id: i64) -> AppResult<QuestionRecord> {
        let path = format!("/questions/{}", question_id);
        self.send_json(&path, self.request(Method::GET, &path)).await
    }

    pub async fn delete_question(&self, question_id: i64) -> AppResult<()> {
        let path = format!("/questions/{}", question_id);
        self.send(&path, self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn list_questions_by_subtopic(
        &self,
        subtopic_id: i64,
    ) -> AppResult<Vec<QuestionRecord>> {
        let path = format!("/subtopics/{}/questions", subtopic_id);
        self.send_json(&path, self.request(Method::GET, &path)).await
    }

    pub async fn search_questions(
        &self,
        filter: &QuestionFilter,
        page: u32,
        page_size: u32,
    ) -> AppResult<Page<QuestionRecord>> {
        let path = "/questions";
        let mut query = filter.query_pairs();
        query.push(("page", page.to_string()));
        query.push(("pageSize", page_size.to_string()));
        let builder = self.request(Method::GET, path).query(&query);
        self.send_json(path, builder).await
    }

    // ========== 课程层级 ==========

    pub async fn list_grades(&self) -> AppResult<Vec<Grade>> {
        let path = "/grades";
        self.send_json(path, self.request(Method::GET, path)).await
    }

    pub async fn list_subjects(&self, grade_id: i64) -> AppResult<Vec<Subject>> {
        let path = format!("/grades/{}/subjects", grade_id);
        self.send_json(&path, self.request(Method::GET, &path)).await
    }

    pub async fn list_topics(&self, subject_id: i64) -> AppResult<Vec<Topic>> {
        let path = format!("/subjects/{}/topics", subject_id);
        self.send_json(&path, self.request(Method::GET, &path)).await
    }

    pub async fn list_subtopics(&self, topic_id: i64) -> AppResult<Vec<SubTopic>> {
        let path = format!("/topics/{}/subtopics", topic_id);
        self.send_json(&path, self.request(Method::GET, &path)).await
    }

    // ========== 图片 ==========

    /// multipart 上传，返回持久 URL
    pub async fn upload_image(&self, file: &ImageFile) -> AppResult<String> {
        let path = "/uploads/images";
        let form = multipart::Form::new().part("file", image_part(file)?);

        let body = self
            .send(path, self.request(Method::POST, path).multipart(form))
            .await?;
        parse_upload_url(&body).ok_or_else(|| {
            warn!("上传响应中没有 URL: {}", body);
            AppError::Upload {
                failed: vec![file.file_name.clone()],
            }
        })
    }

    // ========== 管理员 ==========

    pub async fn list_admins(&self) -> AppResult<Vec<Admin>> {
        let path = "/admins";
        self.send_json(path, self.request(Method::GET, path)).await
    }

    pub async fn create_admin(&self, payload: &AdminPayload) -> AppResult<Admin> {
        let path = "/admins";
        self.send_json(path, self.request(Method::POST, path).json(payload))
            .await
    }

    pub async fn update_admin(&self, admin_id: i64, payload: &AdminPayload) -> AppResult<Admin> {
        let path = format!("/admins/{}", admin_id);
        self.send_json(&path, self.request(Method::PUT, &path).json(payload))
            .await
    }

    pub async fn delete_admin(&self, admin_id: i64) -> AppResult<()> {
        let path = format!("/admins/{}", admin_id);
        self.send(&path, self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn list_reset_requests(
        &self,
        status: Option<ResetStatus>,
    ) -> AppResult<Vec<PasswordResetRequest>> {
        let path = "/admins/password-resets";
        let mut builder = self.request(Method::GET, path);
        if let Some(status) = status {
            builder = builder.query(&[("status", status.as_str())]);
        }
        self.send_json(path, builder).await
    }

    pub async fn approve_reset(&self, request_id: i64) -> AppResult<()> {
        self.resolve_reset(request_id, "approve").await
    }

    pub async fn reject_reset(&self, request_id: i64) -> AppResult<()> {
        self.resolve_reset(request_id, "reject").await
    }

    async fn resolve_reset(&self, request_id: i64, action: &str) -> AppResult<()> {
        let path = format!("/admins/password-resets/{}/{}", request_id, action);
        self.send(&path, self.request(Method::POST, &path)).await?;
        Ok(())
    }

    pub async fn query_audit_logs(
        &self,
        filter: &AuditLogFilter,
    ) -> AppResult<Page<AuditLogEntry>> {
        let path = "/audit-logs";
        self.send_json(path, self.request(Method::GET, path).query(filter))
            .await
    }

    // ========== 账号 ==========

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> AppResult<()> {
        let path = "/auth/change-password";
        let body = json!({ "oldPassword": old_password, "newPassword": new_password });
        self.send(path, self.request(Method::POST, path).json(&body))
            .await?;
        Ok(())
    }

    /// 退出登录，网络错误忽略
    pub async fn logout(&self) {
        let path = "/auth/logout";
        if let Err(e) = self.send(path, self.request(Method::POST, path)).await {
            debug!("退出登录请求失败，已忽略: {}", e);
        }
    }
}

fn question_body(envelope: &Envelope) -> AppResult<Value> {
    Ok(json!({ "payload": envelope.to_json()? }))
}

/// 构造后端错误：优先使用响应体中的 `message` / `error`
pub fn api_error(endpoint: &str, status: u16, body: &str) -> ApiError {
    let kind = ApiErrorKind::from_status(status);
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|key| {
                value
                    .get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| kind.fallback_message().to_string());

    ApiError {
        endpoint: endpoint.to_string(),
        status,
        kind,
        message,
    }
}

/// 上传表单中的文件部分，MIME 非法时按图片错误处理
fn image_part(file: &ImageFile) -> AppResult<multipart::Part> {
    let mime = file.mime().unwrap_or("application/octet-stream");
    multipart::Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(mime)
        .map_err(|e| AppError::InvalidImage {
            file_name: file.file_name.clone(),
            reason: e.to_string(),
        })
}

/// 上传响应可能是 URL 字符串、`{url}` 或 `{data: {url}}`
pub fn parse_upload_url(body: &str) -> Option<String> {
    let url = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(url)) => url,
        Ok(value) => value
            .get("url")
            .or_else(|| value.get("data").and_then(|d| d.get("url")))
            .or_else(|| value.get("data").filter(|d| d.is_string()))
            .and_then(Value::as_str)?
            .to_string(),
        // 纯文本响应只接受 URL 或绝对路径
        Err(_) => {
            let text = body.trim();
            if !["http://", "https://", "/"].iter().any(|p| text.starts_with(p)) {
                return None;
            }
            text.to_string()
        }
    };
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// 响应体可能直接是数据，也可能包在 `data` 里
fn decode_body<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body)?
    };
    match serde_json::from_value::<T>(value.clone()) {
        Ok(data) => Ok(data),
        Err(e) => match value.get("data") {
            Some(data) => Ok(serde_json::from_value(data.clone())?),
            None => Err(e.into()),
        },
    }
}

#[async_trait]
impl ImageUploader for ApiClient {
    async fn upload(&self, file: &ImageFile) -> AppResult<String> {
        self.upload_image(file).await
    }
}

#[async_trait]
impl QuestionStore for ApiClient {
    async fn create(&self, subtopic_id: i64, envelope: &Envelope) -> AppResult<QuestionRecord> {
        self.create_question(subtopic_id, envelope).await
    }

    async fn update(&self, question_id: i64, envelope: &Envelope) -> AppResult<QuestionRecord> {
        self.update_question(question_id, envelope).await
    }
}

#[async_trait]
impl HierarchySource for ApiClient {
    async fn list_grades(&self) -> AppResult<Vec<Grade>> {
        ApiClient::list_grades(self).await
    }

    async fn list_subjects(&self, grade_id: i64) -> AppResult<Vec<Subject>> {
        ApiClient::list_subjects(self, grade_id).await
    }

    async fn list_topics(&self, subject_id: i64) -> AppResult<Vec<Topic>> {
        ApiClient::list_topics(self, subject_id).await
    }

    async fn list_subtopics(&self, topic_id: i64) -> AppResult<Vec<SubTopic>> {
        ApiClient::list_subtopics(self, topic_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_prefers_body_message() {
        let err = api_error("/questions", 409, r#"{"message":"Câu hỏi đã tồn tại"}"#);
        assert_eq!(err.kind, ApiErrorKind::Conflict);
        assert_eq!(err.message, "Câu hỏi đã tồn tại");

        let err = api_error("/questions", 400, r#"{"error":"Bad payload"}"#);
        assert_eq!(err.message, "Bad payload");
    }

    #[test]
    fn test_api_error_fallbacks() {
        let err = api_error("/admins", 403, "");
        assert_eq!(err.message, ApiErrorKind::PermissionDenied.fallback_message());

        let err = api_error("/admins", 401, "<html>Unauthorized</html>");
        assert_eq!(err.kind, ApiErrorKind::SessionExpired);
        assert_eq!(err.message, ApiErrorKind::SessionExpired.fallback_message());

        let err = api_error("/admins", 502, r#"{"message":"  "}"#);
        assert_eq!(err.message, ApiErrorKind::Other.fallback_message());
    }

    #[test]
    fn test_parse_upload_url_shapes() {
        assert_eq!(
            parse_upload_url(r#""https://cdn/a.png""#).as_deref(),
            Some("https://cdn/a.png")
        );
        assert_eq!(
            parse_upload_url(r#"{"url":"https://cdn/b.png"}"#).as_deref(),
            Some("https://cdn/b.png")
        );
        assert_eq!(
            parse_upload_url(r#"{"data":{"url":"https://cdn/c.png"}}"#).as_deref(),
            Some("https://cdn/c.png")
        );
        assert_eq!(
            parse_upload_url("https://cdn/d.png\n").as_deref(),
            Some("https://cdn/d.png")
        );
        assert_eq!(parse_upload_url(r#"{"ok":true}"#), None);
        assert_eq!(
            parse_upload_url("/uploads/e.png").as_deref(),
            Some("/uploads/e.png")
        );
        assert_eq!(
            parse_upload_url("<html><body>502 Bad Gateway</body></html>"),
            None
        );
        assert_eq!(parse_upload_url("OK"), None);
    }

    #[test]
    fn test_bad_mime_is_invalid_image() {
        let file = ImageFile::new("cat.png", "not a mime", vec![1, 2, 3]);
        match image_part(&file) {
            Err(AppError::InvalidImage { file_name, .. }) => assert_eq!(file_name, "cat.png"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("bad MIME accepted"),
        }
        assert!(image_part(&ImageFile::new("cat.png", "", vec![1])).is_ok());
    }

    #[test]
    fn test_decode_body_unwraps_data() {
        let grades: Vec<Grade> = decode_body(r#"{"data":[{"id":1,"name":"Lớp 1"}]}"#).unwrap();
        assert_eq!(grades[0].name, "Lớp 1");
        let grades: Vec<Grade> = decode_body(r#"[{"id":2,"name":"Lớp 2"}]"#).unwrap();
        assert_eq!(grades[0].id, 2);
    }

    #[test]
    fn test_url_join() {
        let config = Config {
            api_base_url: "http://host/api/".into(),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/grades"), "http://host/api/grades");
    }
}
