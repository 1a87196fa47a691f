use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::error::AbraError;

/// 查询参数
///
/// - `Pairs`: 键值对，构建请求时逐个编码并以 `&` 连接
/// - `Encoded`: 已编码的查询字符串，原样追加到 URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    Pairs(Vec<(String, String)>),
    Encoded(String),
}

impl Params {
    /// 从可序列化的值（结构体、map、元组列表）生成键值对参数
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, AbraError> {
        let encoded = serde_urlencoded::to_string(value)?;
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(&encoded)?;
        Ok(Params::Pairs(pairs))
    }
}

/// 请求体
///
/// `Json` 在构建请求时序列化为 JSON 文本；`Text` 和 `Bytes` 视为已编码的内容，原样透传。
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
}

impl Body {
    /// 将任意可序列化的值转换为 JSON 请求体
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, AbraError> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    /// 生成 `application/x-www-form-urlencoded` 编码的请求体
    ///
    /// 调用方需要自行设置对应的 `Content-Type` 头部。
    pub fn form<K, V>(pairs: &[(K, V)]) -> Result<Self, AbraError>
    where
        K: Serialize,
        V: Serialize,
    {
        Ok(Body::Text(serde_urlencoded::to_string(pairs)?))
    }

    /// 编码后的字节
    pub fn into_bytes(self) -> Result<Bytes, AbraError> {
        match self {
            Body::Json(value) => Ok(Bytes::from(serde_json::to_vec(&value)?)),
            Body::Text(text) => Ok(Bytes::from(text)),
            Body::Bytes(bytes) => Ok(bytes),
        }
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

/// 单次调用的请求配置
///
/// 传入调用后不会被修改，每次调用都会基于它派生出新的请求。
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// 请求头部，按添加顺序保存
    pub headers: Vec<(String, String)>,
    /// 查询参数
    pub params: Option<Params>,
    /// 超时时间，设置后会为请求分配取消信号
    pub timeout: Option<Duration>,
    /// 原始请求体，动词方法传入的请求体优先
    pub body: Option<Body>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个请求头部
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 添加一个查询参数，已编码的查询字符串会被替换为键值对形式
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let pair = (key.into(), value.to_string());
        match &mut self.params {
            Some(Params::Pairs(pairs)) => pairs.push(pair),
            _ => self.params = Some(Params::Pairs(vec![pair])),
        }
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 以毫秒设置超时时间
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// 调用方是否显式设置了 `Content-Type`
    pub fn has_content_type(&self) -> bool {
        self.headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
    }
}
