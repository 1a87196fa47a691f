use bytes::Bytes;
use mime::Mime;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;

use crate::types::http::{ContentKind, HttpMethod};

/// 发往传输层的请求描述
///
/// 拦截器可以原地修改后返回，也可以构造新的请求替换它。
#[derive(Debug, Clone)]
pub struct Request {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// 取消信号，仅在配置了超时时存在
    pub signal: Option<CancellationToken>,
}

impl Request {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            signal: None,
        }
    }

    /// 设置头部（覆盖同名头部），便于在拦截器中链式使用
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// 信号是否已被取消
    pub fn is_cancelled(&self) -> bool {
        self.signal
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// 传输层返回的响应描述
///
/// 客户端只关心状态码、`ok` 标志和头部，响应体在解码阶段才被解释。
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    /// 最终请求地址（包含查询参数）
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, url: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// 状态码是否为 2xx
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// 按名称查找头部（不区分大小写），非 ASCII 的值视为缺失
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// 解析后的 `Content-Type`，缺失或无法解析时为 `None`
    pub fn mime(&self) -> Option<Mime> {
        self.content_type().and_then(|value| value.parse().ok())
    }

    pub fn content_kind(&self) -> ContentKind {
        self.mime()
            .as_ref()
            .map_or(ContentKind::Binary, ContentKind::from_mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok_flag() {
        assert!(Response::new(StatusCode::OK, "http://localhost").ok());
        assert!(Response::new(StatusCode::NO_CONTENT, "http://localhost").ok());
        assert!(!Response::new(StatusCode::NOT_FOUND, "http://localhost").ok());
        assert!(!Response::new(StatusCode::INTERNAL_SERVER_ERROR, "http://localhost").ok());
    }

    #[test]
    fn test_response_header_lookup_is_case_insensitive() {
        let response = Response::new(StatusCode::OK, "http://localhost").with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.content_kind(), ContentKind::Json);
    }

    #[test]
    fn test_response_without_content_type_is_binary() {
        let response = Response::new(StatusCode::OK, "http://localhost");
        assert_eq!(response.content_type(), None);
        assert_eq!(response.content_kind(), ContentKind::Binary);
    }

    #[test]
    fn test_response_with_unparsable_content_type_is_binary() {
        let response = Response::new(StatusCode::OK, "http://localhost")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("not a mime type"));
        assert!(response.mime().is_none());
        assert_eq!(response.content_kind(), ContentKind::Binary);
    }

    #[test]
    fn test_response_mime_keeps_parameters() {
        let response = Response::new(StatusCode::OK, "http://localhost").with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=XyZ"),
        );
        let parsed = response.mime().unwrap();
        let boundary = parsed.get_param(mime::BOUNDARY).map(|value| value.as_str().to_string());
        assert_eq!(boundary.as_deref(), Some("XyZ"));
        assert_eq!(response.content_kind(), ContentKind::Form);
    }

    #[test]
    fn test_request_signal_state() {
        let mut request = Request::new(HttpMethod::Get, "http://localhost");
        assert!(!request.is_cancelled());

        let token = CancellationToken::new();
        request.signal = Some(token.clone());
        assert!(!request.is_cancelled());
        token.cancel();
        assert!(request.is_cancelled());
    }
}
