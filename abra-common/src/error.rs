use reqwest::StatusCode;
use thiserror::Error;

/// Abra 客户端错误类型
///
/// 分为三类：
/// - 传输错误：网络失败或请求被取消（`Transport`、`Aborted`、`InvalidUrl`）
/// - 服务端错误：非 2xx 响应，携带服务端返回的 `message` 字段（`Server`）
/// - 编解码错误：请求构建或响应解析失败（`Json`、`FormDecode`、`FormEncode`、`Multipart` 等）
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AbraError {
    /// 传输层错误（网络、连接等）
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 请求在完成前被取消信号中止
    #[error("Request aborted before completion")]
    Aborted,

    /// 服务端返回非 2xx 状态码
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    /// JSON 序列化或解析失败
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// 表单解码失败
    #[error("Form decoding failed: {0}")]
    FormDecode(#[from] serde_urlencoded::de::Error),

    /// 表单编码失败
    #[error("Form encoding failed: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// multipart 响应体格式错误
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] multer::Error),

    /// 无效的头部名称
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),

    /// 无效的头部值
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    /// 无法解析的 URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl AbraError {
    /// 包装任意传输层错误
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AbraError::Transport(Box::new(err))
    }

    /// 服务端返回的状态码（仅 `Server` 错误有）
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AbraError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, AbraError::Aborted)
    }
}

pub type Result<T> = std::result::Result<T, AbraError>;
